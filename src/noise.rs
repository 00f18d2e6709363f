//! # 噪声层
//!
//! 编码完成后可选的抖动处理：每个像素以 10% 的概率整体加减 1。
//! 噪声可能翻转已嵌入的比特，这是已知并接受的代价。

use rand::Rng;

use crate::constants::{BYTES_PER_PIXEL, COLOR_CHANNELS, NOISE_PROBABILITY};

/// 对 RGB 通道加入 ±1 噪声，结果限制在 `[0, 255]`，alpha 不变。
///
/// 返回被扰动的像素数。随机源由调用方提供。
pub fn add_noise<R: Rng + ?Sized>(pixels: &mut [u8], rng: &mut R) -> usize {
    let mut touched = 0;
    for pixel in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
        if rng.random::<f64>() >= NOISE_PROBABILITY {
            continue;
        }
        let delta: i16 = if rng.random::<f64>() < 0.5 { -1 } else { 1 };
        for sample in &mut pixel[..COLOR_CHANNELS] {
            *sample = (i16::from(*sample) + delta).clamp(0, 255) as u8;
        }
        touched += 1;
    }
    touched
}
