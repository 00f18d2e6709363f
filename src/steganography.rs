//! # 隐写流程
//!
//! 把掩码、比特流封装和通道编码串起来：
//!
//! ```text
//! 消息 -> [异或掩码] -> 比特流封装 -> 通道编码 -> 像素缓冲区
//! 像素缓冲区 -> 通道解码 -> 比特流解析 -> [异或掩码] -> 消息
//! ```
//!
//! 这里的函数不持有任何状态，图像尺寸、密码、方案都由调用方显式传入。

use tracing::{debug, info};

use crate::capacity::capacity;
use crate::cipher::xor_mask;
use crate::codec::{DecodeMethod, Scheme};
use crate::constants::{BYTES_PER_PIXEL, MAX_MESSAGE_LEN, PRINTABLE_RATIO};
use crate::error::{Result, StegoError};
use crate::framing::{frame, from_latin1, to_latin1, unframe};

/// 解码得到的消息及实际使用的方案。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered {
    pub scheme: Scheme,
    pub message: String,
}

/// 校验缓冲区与图像尺寸是否一致。
fn check_image(pixels: &[u8], width: u32, height: u32) -> Result<()> {
    if pixels.is_empty() || width == 0 || height == 0 {
        return Err(StegoError::InvalidInput("no image provided".into()));
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| {
            StegoError::InvalidInput(format!("image dimensions {width}x{height} are too large"))
        })?;
    if pixels.len() != expected {
        return Err(StegoError::InvalidInput(format!(
            "pixel buffer holds {} bytes, expected {expected} for a {width}x{height} RGBA image",
            pixels.len()
        )));
    }
    Ok(())
}

/// 密码一旦提供就不能为空。
fn check_password(password: Option<&str>) -> Result<()> {
    match password {
        Some(p) if p.is_empty() => Err(StegoError::InvalidInput("password is empty".into())),
        _ => Ok(()),
    }
}

/// 将消息隐藏到 RGBA 像素缓冲区中。
///
/// 消息长度以顺序 1 位方案的容量为上限，与所选方案无关。
///
/// # Arguments
///
/// * `pixels` - `width * height * 4` 字节的 RGBA 缓冲区，成功时被就地修改。
/// * `message` - 要隐藏的文本，每个字符必须在 U+0000 到 U+00FF 之间。
/// * `password` - 可选的掩码密码。
///
/// # Errors
///
/// * 图像为空、消息为空、密码为空或字符超出单字节范围时返回 [`StegoError::InvalidInput`]。
/// * 消息超过容量时返回 [`StegoError::CapacityExceeded`]。
/// * 方案的写入位置不够时返回 [`StegoError::BufferExhausted`]。
///
/// 任何错误发生时缓冲区都未被修改。
pub fn encode_message(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    message: &str,
    scheme: Scheme,
    password: Option<&str>,
) -> Result<()> {
    check_image(pixels, width, height)?;
    if message.is_empty() {
        return Err(StegoError::InvalidInput("message is empty".into()));
    }
    check_password(password)?;

    let payload = to_latin1(message)?;
    let capacity = capacity(width, height).min(MAX_MESSAGE_LEN);
    if payload.len() > capacity {
        return Err(StegoError::CapacityExceeded {
            length: payload.len(),
            capacity,
        });
    }

    let payload = match password {
        Some(key) => xor_mask(&payload, key.as_bytes()),
        None => payload,
    };
    let bits = frame(&payload);
    scheme.codec().encode(pixels, &bits)?;

    info!(%scheme, length = payload.len(), bits = bits.len(), "message embedded");
    Ok(())
}

/// 用指定方案读出载荷 (仍是掩码后的字节)。
fn extract(pixels: &[u8], scheme: Scheme) -> Result<Vec<u8>> {
    unframe(&scheme.codec().decode(pixels)?)
}

/// 依次尝试 lsb、lsb2，结果缺失或不像文本时换下一个；最后无条件接受 random 的结果。
fn auto_detect(pixels: &[u8]) -> Result<(Scheme, Vec<u8>)> {
    for scheme in [Scheme::Lsb, Scheme::Lsb2] {
        match extract(pixels, scheme) {
            Ok(payload) if is_valid_message(&from_latin1(&payload)) => {
                debug!(%scheme, "auto-detect accepted");
                return Ok((scheme, payload));
            }
            Ok(_) => debug!(%scheme, "auto-detect rejected implausible text"),
            Err(e) => debug!(%scheme, error = %e, "auto-detect found nothing"),
        }
    }

    match extract(pixels, Scheme::Random) {
        Ok(payload) => {
            debug!(scheme = %Scheme::Random, "auto-detect fell back");
            Ok((Scheme::Random, payload))
        }
        Err(e) => {
            debug!(scheme = %Scheme::Random, error = %e, "auto-detect exhausted all schemes");
            Err(StegoError::NoMessageFound)
        }
    }
}

/// 从 RGBA 像素缓冲区中恢复消息。
///
/// `method` 为 [`DecodeMethod::Auto`] 时按固定顺序尝试各方案。
/// 提供密码时在解析之后去除掩码；密码错误不会报错，只会得到乱码。
///
/// # Errors
///
/// * 缓冲区为空或密码为空时返回 [`StegoError::InvalidInput`]。
/// * 长度前缀无效或自动检测全部失败时返回 [`StegoError::NoMessageFound`]。
/// * 指定方案读取越界时返回 [`StegoError::BufferExhausted`]。
pub fn decode_message(
    pixels: &[u8],
    method: DecodeMethod,
    password: Option<&str>,
) -> Result<Recovered> {
    if pixels.is_empty() {
        return Err(StegoError::InvalidInput("no image provided".into()));
    }
    check_password(password)?;

    let (scheme, payload) = match method.scheme() {
        Some(scheme) => (scheme, extract(pixels, scheme)?),
        None => auto_detect(pixels)?,
    };

    let payload = match password {
        Some(key) => xor_mask(&payload, key.as_bytes()),
        None => payload,
    };

    info!(%scheme, length = payload.len(), "message recovered");
    Ok(Recovered {
        scheme,
        message: from_latin1(&payload),
    })
}

/// 判断解码结果是否像文本：长度在 1 到 10000 之间，
/// 且可打印 ASCII (32..=126) 与换行、回车的占比超过 80%。
pub fn is_valid_message(message: &str) -> bool {
    let length = message.chars().count();
    if length == 0 || length > MAX_MESSAGE_LEN {
        return false;
    }
    let printable = message
        .chars()
        .filter(|&c| matches!(c, ' '..='~' | '\n' | '\r'))
        .count();
    printable as f64 / length as f64 > PRINTABLE_RATIO
}

/// 把消息平均分给 `parts` 张图像，每份带上 `[序号/总数] ` 标记。
///
/// 每份长度为 `ceil(len / parts)`，排在末尾的图像可能只得到标记。
pub fn split_message(message: &str, parts: usize) -> Vec<String> {
    if parts == 0 {
        return Vec::new();
    }
    let chars: Vec<char> = message.chars().collect();
    let chunk = chars.len().div_ceil(parts);

    (0..parts)
        .map(|i| {
            let start = (i * chunk).min(chars.len());
            let end = (start + chunk).min(chars.len());
            let body: String = chars[start..end].iter().collect();
            format!("[{}/{}] {}", i + 1, parts, body)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> Vec<u8> {
        (0..width * height * 4).map(|i| (i * 7 % 251) as u8).collect()
    }

    #[test]
    fn hi_in_ten_by_ten() {
        let mut pixels = image(10, 10);
        encode_message(&mut pixels, 10, 10, "HI", Scheme::Lsb, None).unwrap();
        let recovered = decode_message(&pixels, DecodeMethod::Lsb, None).unwrap();
        assert_eq!(recovered.message, "HI");
        assert_eq!(recovered.scheme, Scheme::Lsb);
    }

    #[test]
    fn six_chars_exceed_ten_by_ten() {
        let original = image(10, 10);
        let mut pixels = original.clone();
        assert_eq!(
            encode_message(&mut pixels, 10, 10, "abcdef", Scheme::Lsb, None),
            Err(StegoError::CapacityExceeded {
                length: 6,
                capacity: 5
            })
        );
        assert_eq!(pixels, original);
    }

    #[test]
    fn every_scheme_round_trips_with_password() {
        for scheme in [Scheme::Lsb, Scheme::Lsb2, Scheme::Random] {
            let mut pixels = image(40, 30);
            let message = "Meet me at the old mill, 23:00.\nBring the map.";
            encode_message(&mut pixels, 40, 30, message, scheme, Some("hunter2")).unwrap();

            let recovered =
                decode_message(&pixels, DecodeMethod::from(scheme), Some("hunter2")).unwrap();
            assert_eq!(recovered.message, message, "scheme {scheme}");
        }
    }

    #[test]
    fn wrong_password_yields_garbage() {
        let mut pixels = image(40, 30);
        encode_message(&mut pixels, 40, 30, "secret", Scheme::Lsb, Some("right")).unwrap();
        let recovered = decode_message(&pixels, DecodeMethod::Lsb, Some("wrong")).unwrap();
        assert_ne!(recovered.message, "secret");
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let mut pixels = image(10, 10);
        let invalid = |r: Result<()>| matches!(r, Err(StegoError::InvalidInput(_)));

        assert!(invalid(encode_message(&mut pixels, 10, 10, "", Scheme::Lsb, None)));
        assert!(invalid(encode_message(&mut pixels, 10, 10, "HI", Scheme::Lsb, Some(""))));
        assert!(invalid(encode_message(&mut [], 0, 0, "HI", Scheme::Lsb, None)));
        assert!(invalid(encode_message(&mut pixels, 10, 9, "HI", Scheme::Lsb, None)));
        assert!(invalid(encode_message(&mut pixels, 10, 10, "隐", Scheme::Lsb, None)));
        assert!(invalid(encode_message(
            &mut [0u8; 16],
            u32::MAX,
            u32::MAX,
            "HI",
            Scheme::Lsb,
            None
        )));

        assert!(matches!(
            decode_message(&[], DecodeMethod::Auto, None),
            Err(StegoError::InvalidInput(_))
        ));
        assert!(matches!(
            decode_message(&pixels, DecodeMethod::Auto, Some("")),
            Err(StegoError::InvalidInput(_))
        ));
    }

    #[test]
    fn auto_detect_prefers_sequential() {
        let mut pixels = image(30, 30);
        encode_message(&mut pixels, 30, 30, "plain text here", Scheme::Lsb, None).unwrap();
        let recovered = decode_message(&pixels, DecodeMethod::Auto, None).unwrap();
        assert_eq!(recovered.scheme, Scheme::Lsb);
        assert_eq!(recovered.message, "plain text here");

        let mut pixels = image(30, 30);
        encode_message(&mut pixels, 30, 30, "two bit payload", Scheme::Lsb2, None).unwrap();
        let recovered = decode_message(&pixels, DecodeMethod::Auto, None).unwrap();
        assert_eq!(recovered.scheme, Scheme::Lsb2);
        assert_eq!(recovered.message, "two bit payload");
    }

    #[test]
    fn auto_detect_on_blank_image_finds_nothing() {
        let pixels = vec![0u8; 20 * 20 * 4];
        assert_eq!(
            decode_message(&pixels, DecodeMethod::Auto, None),
            Err(StegoError::NoMessageFound)
        );
    }

    #[test]
    fn plausibility_filter() {
        assert!(is_valid_message("Hello"));
        assert!(is_valid_message("line one\r\nline two"));
        assert!(!is_valid_message(""));
        assert!(!is_valid_message(&"a".repeat(10_001)));
        assert!(is_valid_message(&"a".repeat(10_000)));
        // 4/5 = 80%，不满足严格大于
        assert!(!is_valid_message("abcd\u{1}"));
        assert!(is_valid_message("abcde\u{1}"));
        assert!(!is_valid_message("\u{0}\u{1}\u{2}\u{ff}"));
    }

    #[test]
    fn split_tags_each_share() {
        assert_eq!(
            split_message("abcdefg", 3),
            vec!["[1/3] abc", "[2/3] def", "[3/3] g"]
        );
        assert_eq!(
            split_message("abcde", 4),
            vec!["[1/4] ab", "[2/4] cd", "[3/4] e", "[4/4] "]
        );
        assert!(split_message("abc", 0).is_empty());
    }
}
