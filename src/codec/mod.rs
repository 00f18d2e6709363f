//! # 通道编码
//!
//! 三种可互换的比特映射策略。它们共享同一个比特流格式
//! (见 [`framing`](crate::framing))，区别只在于第 `i` 个比特写入哪个字节、写入几位。

mod random;
mod sequential;
mod sequential2;

pub use random::RandomLsb;
pub use sequential::SequentialLsb;
pub use sequential2::SequentialLsb2;

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::constants::{BYTES_PER_PIXEL, COLOR_CHANNELS};
use crate::error::{Result, StegoError};

/// 一种把比特流映射到像素缓冲区的方式。
pub trait Codec {
    /// 把完整的比特流写入缓冲区。
    ///
    /// 容量不足时返回错误，并且不修改缓冲区。
    fn encode(&self, pixels: &mut [u8], bits: &[u8]) -> Result<()>;

    /// 读出完整的比特流 (长度前缀 + 载荷)。
    fn decode(&self, pixels: &[u8]) -> Result<Vec<u8>>;
}

/// 编码方案。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Scheme {
    /// 按顺序每个 RGB 样本写 1 位。
    #[value(name = "lsb")]
    Lsb,
    /// 按顺序每个 RGB 样本写 2 位。
    #[value(name = "lsb2")]
    Lsb2,
    /// 按伪随机位置每个 RGB 样本写 1 位。
    #[value(name = "random")]
    Random,
}

impl Scheme {
    /// 方案对应的编码器。
    pub fn codec(self) -> &'static dyn Codec {
        match self {
            Scheme::Lsb => &SequentialLsb,
            Scheme::Lsb2 => &SequentialLsb2,
            Scheme::Random => &RandomLsb,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Lsb => "lsb",
            Scheme::Lsb2 => "lsb2",
            Scheme::Random => "random",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lsb" => Ok(Scheme::Lsb),
            "lsb2" => Ok(Scheme::Lsb2),
            "random" => Ok(Scheme::Random),
            other => Err(StegoError::InvalidInput(format!(
                "unknown scheme '{other}'"
            ))),
        }
    }
}

/// 解码时的方案选择：指定某个方案，或按固定顺序自动检测。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum DecodeMethod {
    /// 依次尝试 lsb、lsb2，最后无条件回退到 random。
    #[default]
    #[value(name = "auto")]
    Auto,
    #[value(name = "lsb")]
    Lsb,
    #[value(name = "lsb2")]
    Lsb2,
    #[value(name = "random")]
    Random,
}

impl DecodeMethod {
    /// 指定的方案；自动检测时为 `None`。
    pub fn scheme(self) -> Option<Scheme> {
        match self {
            DecodeMethod::Auto => None,
            DecodeMethod::Lsb => Some(Scheme::Lsb),
            DecodeMethod::Lsb2 => Some(Scheme::Lsb2),
            DecodeMethod::Random => Some(Scheme::Random),
        }
    }
}

impl fmt::Display for DecodeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scheme() {
            Some(scheme) => f.write_str(scheme.as_str()),
            None => f.write_str("auto"),
        }
    }
}

impl From<Scheme> for DecodeMethod {
    fn from(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Lsb => DecodeMethod::Lsb,
            Scheme::Lsb2 => DecodeMethod::Lsb2,
            Scheme::Random => DecodeMethod::Random,
        }
    }
}

impl FromStr for DecodeMethod {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(DecodeMethod::Auto),
            other => other.parse::<Scheme>().map(DecodeMethod::from),
        }
    }
}

/// 按缓冲区顺序排列的 RGB 字节偏移：像素 0 的 R、G、B，然后是像素 1，依此类推。
pub(crate) fn rgb_offsets(buffer_len: usize) -> impl Iterator<Item = usize> {
    (0..)
        .map(|i| i / COLOR_CHANNELS * BYTES_PER_PIXEL + i % COLOR_CHANNELS)
        .take_while(move |&offset| offset < buffer_len)
}

/// 取前 `count` 个偏移，不够时返回 [`StegoError::BufferExhausted`]。
pub(crate) fn take_slots(
    offsets: impl Iterator<Item = usize>,
    count: usize,
    buffer_len: usize,
) -> Result<Vec<usize>> {
    let slots: Vec<usize> = offsets.take(count).collect();
    if slots.len() < count {
        return Err(StegoError::BufferExhausted {
            needed: count,
            available: crate::positions::rgb_slots(buffer_len),
        });
    }
    Ok(slots)
}
