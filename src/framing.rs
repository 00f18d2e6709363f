//! # 比特流封装
//!
//! 把载荷转换成 `32 位长度前缀 + 载荷比特` 的比特流，以及相反的过程。
//! 三种通道编码共用这一格式，区别只在于比特写到缓冲区的哪个位置。
//!
//! 比特流中每个元素是 `0` 或 `1`，均为高位在前。

use crate::constants::{BITS_PER_CHAR, LENGTH_PREFIX_BITS, MAX_MESSAGE_LEN};
use crate::error::{Result, StegoError};

/// 将文本转换为单字节编码 (Latin-1)。
///
/// 每个字符必须能用 8 位表示，超出 U+00FF 的字符会被拒绝，而不是被截断。
///
/// # Errors
///
/// 任一字符码点大于 255 时返回 [`StegoError::InvalidInput`]。
pub fn to_latin1(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            u8::try_from(u32::from(c)).map_err(|_| {
                StegoError::InvalidInput(format!(
                    "character {c:?} at index {i} does not fit in a single byte"
                ))
            })
        })
        .collect()
}

/// 将单字节编码还原为文本，每个字节对应一个字符。
pub fn from_latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// 编码 `len` 个字符所需的总比特数 (含长度前缀)。
pub fn framed_len(len: usize) -> usize {
    LENGTH_PREFIX_BITS + len * BITS_PER_CHAR
}

/// 把 `value` 的低 `width` 位按高位在前追加到 `out`。
fn push_bits(out: &mut Vec<u8>, value: u32, width: usize) {
    out.extend((0..width).rev().map(|shift| ((value >> shift) & 1) as u8));
}

/// 把高位在前的比特序列合并成一个整数。
fn pack_bits(bits: &[u8]) -> u32 {
    bits.iter().fold(0, |acc, &bit| (acc << 1) | u32::from(bit & 1))
}

/// 生成带长度前缀的比特流。
///
/// 长度前缀记录的是字符数而不是比特数。
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(framed_len(payload.len()));
    push_bits(&mut bits, payload.len() as u32, LENGTH_PREFIX_BITS);
    for &byte in payload {
        push_bits(&mut bits, u32::from(byte), BITS_PER_CHAR);
    }
    bits
}

/// 从比特流开头解析长度前缀。
///
/// # Errors
///
/// * 比特数不足 32 位时返回 [`StegoError::BufferExhausted`]。
/// * 长度为 0 或超过 [`MAX_MESSAGE_LEN`] 时返回 [`StegoError::NoMessageFound`]。
pub fn read_length(bits: &[u8]) -> Result<usize> {
    let prefix = bits
        .get(..LENGTH_PREFIX_BITS)
        .ok_or(StegoError::BufferExhausted {
            needed: LENGTH_PREFIX_BITS,
            available: bits.len(),
        })?;

    let length = pack_bits(prefix) as usize;
    if length == 0 || length > MAX_MESSAGE_LEN {
        return Err(StegoError::NoMessageFound);
    }
    Ok(length)
}

/// 解析完整的比特流并返回载荷字节。
///
/// # Errors
///
/// * 长度前缀无效时返回 [`StegoError::NoMessageFound`]。
/// * 载荷比特不足时返回 [`StegoError::BufferExhausted`]。
pub fn unframe(bits: &[u8]) -> Result<Vec<u8>> {
    let length = read_length(bits)?;
    let needed = framed_len(length);
    let body = bits
        .get(LENGTH_PREFIX_BITS..needed)
        .ok_or(StegoError::BufferExhausted {
            needed,
            available: bits.len(),
        })?;

    Ok(body
        .chunks_exact(BITS_PER_CHAR)
        .map(|chunk| pack_bits(chunk) as u8)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_writes_big_endian_length_then_bytes() {
        let bits = frame(b"H");
        assert_eq!(bits.len(), 40);
        assert_eq!(&bits[..31], &[0u8; 31]);
        assert_eq!(bits[31], 1);
        // 'H' = 0x48 = 0100_1000
        assert_eq!(&bits[32..], &[0, 1, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn unframe_recovers_payload() {
        let bits = frame(b"Hello, world");
        assert_eq!(unframe(&bits).unwrap(), b"Hello, world");
    }

    #[test]
    fn unframe_ignores_trailing_bits() {
        let mut bits = frame(b"ok");
        bits.extend([1, 0, 1, 1]);
        assert_eq!(unframe(&bits).unwrap(), b"ok");
    }

    #[test]
    fn zero_length_is_no_message() {
        let bits = vec![0u8; 64];
        assert_eq!(unframe(&bits), Err(StegoError::NoMessageFound));
    }

    #[test]
    fn oversized_length_is_no_message() {
        let mut bits = Vec::new();
        push_bits(&mut bits, (MAX_MESSAGE_LEN + 1) as u32, LENGTH_PREFIX_BITS);
        assert_eq!(read_length(&bits), Err(StegoError::NoMessageFound));

        let mut bits = Vec::new();
        push_bits(&mut bits, MAX_MESSAGE_LEN as u32, LENGTH_PREFIX_BITS);
        assert_eq!(read_length(&bits), Ok(MAX_MESSAGE_LEN));
    }

    #[test]
    fn truncated_body_is_exhausted() {
        let mut bits = frame(b"abc");
        bits.truncate(bits.len() - 3);
        assert!(matches!(
            unframe(&bits),
            Err(StegoError::BufferExhausted { needed: 56, .. })
        ));
    }

    #[test]
    fn short_prefix_is_exhausted() {
        assert!(matches!(
            read_length(&[1, 0, 1]),
            Err(StegoError::BufferExhausted { needed: 32, available: 3 })
        ));
    }

    #[test]
    fn latin1_rejects_wide_characters() {
        assert_eq!(to_latin1("café").unwrap(), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(from_latin1(&[b'c', b'a', b'f', 0xE9]), "café");
        assert!(matches!(to_latin1("隐写"), Err(StegoError::InvalidInput(_))));
    }
}
