//! 隐写与分析过程中使用的全部常量。

/// 长度前缀占用的比特数 (大端序 `u32`)。
pub const LENGTH_PREFIX_BITS: usize = 32;

/// 每个载荷字符编码成的比特数。
pub const BITS_PER_CHAR: usize = 8;

/// 解码时可接受的最大消息长度 (字符数)。
pub const MAX_MESSAGE_LEN: usize = 10_000;

/// 每个像素占用的字节数 (R, G, B, A)。
pub const BYTES_PER_PIXEL: usize = 4;

/// 每个像素中可用于隐写的颜色通道数 (R, G, B)。
pub const COLOR_CHANNELS: usize = 3;

/// 随机位置生成器 (线性同余) 的固定种子。
/// 编码与解码必须使用同一个种子，否则位置序列无法对齐。
pub const POSITION_SEED: u64 = 12_345;

/// 线性同余生成器的乘数。
pub const LCG_MULTIPLIER: u64 = 9_301;

/// 线性同余生成器的增量。
pub const LCG_INCREMENT: u64 = 49_297;

/// 线性同余生成器的模数，同时也是其周期上限。
pub const LCG_MODULUS: u64 = 233_280;

/// 随机方案解码时预先生成的位置数量。
pub const RANDOM_DECODE_POSITIONS: usize = 1_000;

/// 可打印字符占比必须严格超过该值，解码结果才被视为有效文本。
pub const PRINTABLE_RATIO: f64 = 0.8;

/// LSB 偏差超过该值时，概率加 `BIAS_WEIGHT`。
pub const BIAS_THRESHOLD: f64 = 0.02;
pub const BIAS_WEIGHT: u32 = 30;

/// 熵低于该值 (比特) 时，概率加 `ENTROPY_WEIGHT`。
pub const ENTROPY_THRESHOLD: f64 = 7.5;
pub const ENTROPY_WEIGHT: u32 = 20;

/// 卡方分数超过该值时，概率加 `CHI_SQUARE_WEIGHT`。
pub const CHI_SQUARE_THRESHOLD: f64 = 50.0;
pub const CHI_SQUARE_WEIGHT: u32 = 30;

/// 卡方分数中随机抖动的上界 (不含)。
pub const CHI_SQUARE_JITTER: f64 = 50.0;

/// 概率中随机抖动的上界 (不含)。
pub const PROBABILITY_JITTER: u32 = 20;

/// 卡方分数的上限。
pub const MAX_CHI_SQUARE: f64 = 100.0;

/// 隐写概率的上限 (百分比)。
pub const MAX_PROBABILITY: u32 = 95;

/// 噪声层中每个像素被扰动的概率。
pub const NOISE_PROBABILITY: f64 = 0.1;
