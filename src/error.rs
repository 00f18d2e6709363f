//! # 错误类型
//!
//! 核心隐写与分析函数返回的全部错误都在这里定义。
//! 所有错误都可恢复，调用方据此决定是否换用更短的消息或其他方案重试。

use thiserror::Error;

/// 核心操作的结果类型。
pub type Result<T> = std::result::Result<T, StegoError>;

/// 隐写编码、解码过程中可能出现的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 输入不合法：没有图像、消息为空、密码为空或字符超出单字节范围。
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 消息长度超过所选方案的容量。
    #[error("Message too long: {length} characters, capacity is {capacity}")]
    CapacityExceeded { length: usize, capacity: usize },

    /// 在写入或读取完整比特流之前像素缓冲区已耗尽。
    #[error("Pixel buffer exhausted: need {needed} slots, only {available} available")]
    BufferExhausted { needed: usize, available: usize },

    /// 长度前缀为 0 或超过上限，或者自动检测尝试了全部方案仍未找到消息。
    #[error("No hidden message found")]
    NoMessageFound,
}
