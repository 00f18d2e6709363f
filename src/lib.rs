//! # pixel_veil 库
//!
//! 本库包含像素域隐写与隐写分析的核心逻辑，以及命令行工具的处理函数。

// 声明库包含的所有模块。

pub mod analysis;
pub mod capacity;
pub mod cipher;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod filters;
pub mod framing;
pub mod handler;
pub mod noise;
pub mod positions;
pub mod steganography;

pub use error::{Result, StegoError};
