//! # 隐写分析
//!
//! 只根据像素统计量估计图像中是否藏有消息，不做任何提取。
//!
//! 熵和 LSB 偏差完全由输入决定；卡方分数和概率含有随机抖动，
//! 随机源由调用方注入，测试时可以替换为固定序列。

use rand::Rng;

use crate::constants::{
    BIAS_THRESHOLD, BIAS_WEIGHT, BYTES_PER_PIXEL, CHI_SQUARE_JITTER, CHI_SQUARE_THRESHOLD,
    CHI_SQUARE_WEIGHT, COLOR_CHANNELS, ENTROPY_THRESHOLD, ENTROPY_WEIGHT, MAX_CHI_SQUARE,
    MAX_PROBABILITY, PROBABILITY_JITTER,
};
use crate::error::{Result, StegoError};

/// 256 个样本值各自出现的次数。
pub type Histogram = [u64; 256];

/// 一次分析的结果。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisResult {
    /// 类卡方分数，`[0, 100]`。
    pub chi_square: f64,
    /// 香农熵 (比特)，`[0, 8]`。
    pub entropy: f64,
    /// 最低位为 1 的比例偏离一半的程度，`[0, 1]`。
    pub lsb_bias: f64,
    /// 含有隐写内容的估计概率 (百分比)，`[0, 95]`。
    pub probability: u32,
}

impl AnalysisResult {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_probability(self.probability)
    }
}

/// 对概率的文字判断。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Clean,
    Possible,
    Likely,
}

impl Verdict {
    pub fn from_probability(probability: u32) -> Self {
        match probability {
            p if p > 70 => Verdict::Likely,
            p if p > 40 => Verdict::Possible,
            _ => Verdict::Clean,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Verdict::Clean => "No steganography detected.",
            Verdict::Possible => "Possible steganographic content detected.",
            Verdict::Likely => "High probability of steganographic content!",
        }
    }
}

/// 统计所有 R、G、B 样本的取值分布，alpha 不计入。
pub fn histogram(pixels: &[u8]) -> Histogram {
    let mut counts = [0u64; 256];
    for pixel in pixels.chunks_exact(BYTES_PER_PIXEL) {
        for &sample in &pixel[..COLOR_CHANNELS] {
            counts[usize::from(sample)] += 1;
        }
    }
    counts
}

/// 直方图分布的香农熵：`-Σ p log2(p)`，只对非零计数求和。
pub fn entropy(histogram: &Histogram) -> f64 {
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0.0;
    }
    histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

/// `|最低位为 1 的样本数 - 总数/2| / (总数/2)`。没有样本时为 0。
pub fn lsb_bias(histogram: &Histogram) -> f64 {
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let ones: u64 = histogram.iter().skip(1).step_by(2).sum();
    let expected = total as f64 / 2.0;
    (ones as f64 - expected).abs() / expected
}

/// 类卡方分数：`lsb_bias * 100` 加上 `[0, 50)` 的随机抖动，封顶 100。
///
/// 这不是真正的统计检验，返回未封顶的值以便概率判断使用。
fn raw_chi_square<R: Rng + ?Sized>(lsb_bias: f64, rng: &mut R) -> f64 {
    lsb_bias * 100.0 + rng.random::<f64>() * CHI_SQUARE_JITTER
}

/// 综合三项指标和 `[0, 20)` 的随机抖动得到概率，封顶 95。
pub fn probability<R: Rng + ?Sized>(
    lsb_bias: f64,
    entropy: f64,
    chi_square: f64,
    rng: &mut R,
) -> u32 {
    let mut probability = 0;
    if lsb_bias > BIAS_THRESHOLD {
        probability += BIAS_WEIGHT;
    }
    if entropy < ENTROPY_THRESHOLD {
        probability += ENTROPY_WEIGHT;
    }
    if chi_square > CHI_SQUARE_THRESHOLD {
        probability += CHI_SQUARE_WEIGHT;
    }
    probability += (rng.random::<f64>() * f64::from(PROBABILITY_JITTER)).floor() as u32;
    probability.min(MAX_PROBABILITY)
}

/// 分析一个像素缓冲区。
///
/// # Errors
///
/// 缓冲区中没有完整像素时返回 [`StegoError::InvalidInput`]。
pub fn analyze<R: Rng + ?Sized>(pixels: &[u8], rng: &mut R) -> Result<AnalysisResult> {
    if pixels.len() < BYTES_PER_PIXEL {
        return Err(StegoError::InvalidInput("no image to analyze".into()));
    }

    let histogram = histogram(pixels);
    let entropy = entropy(&histogram);
    let lsb_bias = lsb_bias(&histogram);
    let chi_square = raw_chi_square(lsb_bias, rng);
    let probability = probability(lsb_bias, entropy, chi_square, rng);

    tracing::debug!(entropy, lsb_bias, chi_square, probability, "statistical analysis");

    Ok(AnalysisResult {
        chi_square: chi_square.min(MAX_CHI_SQUARE),
        entropy,
        lsb_bias,
        probability,
    })
}

/// 直方图柱高：每个计数相对最大计数按 `max_height` 缩放。
pub fn bar_heights(histogram: &Histogram, max_height: f64) -> Vec<f64> {
    let max_count = histogram.iter().copied().max().unwrap_or(0);
    if max_count == 0 {
        return vec![0.0; histogram.len()];
    }
    histogram
        .iter()
        .map(|&count| count as f64 / max_count as f64 * max_height)
        .collect()
}
