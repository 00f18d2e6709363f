//! # 可视化检测滤镜
//!
//! 对像素缓冲区做就地变换，帮助肉眼发现隐写痕迹。alpha 通道保持不变。

use clap::ValueEnum;

use crate::constants::{BYTES_PER_PIXEL, COLOR_CHANNELS};

/// 可用的滤镜。
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Filter {
    /// 提取最低位平面：最低位为 1 的样本变为 255，否则为 0。
    Lsb,
    /// 与左侧像素的差值放大 3 倍，突出细微变化。
    Enhance,
    /// 各通道偏离三通道均值的程度，输出灰度。
    Difference,
}

impl Filter {
    pub fn name(self) -> &'static str {
        match self {
            Filter::Lsb => "lsb",
            Filter::Enhance => "enhance",
            Filter::Difference => "difference",
        }
    }

    /// 就地应用滤镜。
    pub fn apply(self, pixels: &mut [u8]) {
        match self {
            Filter::Lsb => lsb_plane(pixels),
            Filter::Enhance => enhance(pixels),
            Filter::Difference => difference(pixels),
        }
    }
}

fn lsb_plane(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
        for sample in &mut pixel[..COLOR_CHANNELS] {
            *sample = (*sample & 1) * 255;
        }
    }
}

/// 第一个和最后一个像素不参与计算。
fn enhance(pixels: &mut [u8]) {
    let original = pixels.to_vec();
    let end = pixels.len().saturating_sub(BYTES_PER_PIXEL);

    for i in (BYTES_PER_PIXEL..end).step_by(BYTES_PER_PIXEL) {
        for j in 0..COLOR_CHANNELS {
            let diff = original[i + j].abs_diff(original[i + j - BYTES_PER_PIXEL]);
            pixels[i + j] = (u16::from(diff) * 3).min(255) as u8;
        }
    }
}

fn difference(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
        let [r, g, b] = [pixel[0], pixel[1], pixel[2]].map(f64::from);
        let avg = (r + g + b) / 3.0;
        let diff = (r - avg).abs() + (g - avg).abs() + (b - avg).abs();
        let value = (diff * 2.0).min(255.0).round_ties_even() as u8;
        pixel[..COLOR_CHANNELS].fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lsb_plane_maps_parity_to_extremes() {
        let mut pixels: Vec<u8> = vec![3, 4, 255, 77, 0, 1, 2, 200];
        Filter::Lsb.apply(&mut pixels);
        assert_eq!(pixels, vec![255, 0, 255, 77, 0, 255, 0, 200]);
    }

    #[test]
    fn enhance_skips_first_and_last_pixel() {
        let mut pixels: Vec<u8> = vec![
            10, 10, 10, 255, //
            20, 5, 100, 255, //
            20, 5, 100, 255, //
            0, 0, 0, 255,
        ];
        Filter::Enhance.apply(&mut pixels);
        assert_eq!(&pixels[..4], &[10, 10, 10, 255]);
        assert_eq!(&pixels[4..8], &[30, 15, 255, 255]);
        assert_eq!(&pixels[8..12], &[0, 0, 0, 255]);
        assert_eq!(&pixels[12..], &[0, 0, 0, 255]);
    }

    #[test]
    fn difference_is_grey() {
        let mut pixels: Vec<u8> = vec![30, 60, 90, 128, 50, 50, 50, 128];
        Filter::Difference.apply(&mut pixels);
        // avg = 60, diff = 30 + 0 + 30 = 60, * 2 = 120
        assert_eq!(&pixels[..4], &[120, 120, 120, 128]);
        assert_eq!(&pixels[4..], &[0, 0, 0, 128]);
    }

    #[test]
    fn difference_rounds_to_nearest() {
        // avg = 1/3, diff = 2/3 + 1/3 + 1/3 = 4/3, * 2 = 2.67 -> 3
        let mut pixels: Vec<u8> = vec![1, 0, 0, 255];
        Filter::Difference.apply(&mut pixels);
        assert_eq!(&pixels[..3], &[3, 3, 3]);
    }
}
