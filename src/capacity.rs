//! # 容量计算
//!
//! 以顺序 1 位方案为基准计算图像能容纳的最大字符数。

use crate::constants::{COLOR_CHANNELS, LENGTH_PREFIX_BITS};

/// 图像能隐藏的最大字符数：`floor(width * height * 3 / 8) - 32`。
///
/// 太小的图像容量为 0。
pub fn capacity(width: u32, height: u32) -> usize {
    let samples = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(COLOR_CHANNELS);
    (samples / 8).saturating_sub(LENGTH_PREFIX_BITS)
}

/// 容量占用程度。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    Normal,
    /// 占用超过 70%。
    Warning,
    /// 占用超过 90%。
    Danger,
}

/// 消息占用容量的百分比，四舍五入并封顶 100。容量为 0 时视为已满。
pub fn usage_percent(length: usize, capacity: usize) -> u32 {
    if capacity == 0 {
        return 100;
    }
    let percent = (length as f64 / capacity as f64 * 100.0).round();
    percent.min(100.0) as u32
}

/// 根据占用百分比划分等级。
pub fn usage_level(percent: u32) -> UsageLevel {
    match percent {
        p if p > 90 => UsageLevel::Danger,
        p if p > 70 => UsageLevel::Warning,
        _ => UsageLevel::Normal,
    }
}
