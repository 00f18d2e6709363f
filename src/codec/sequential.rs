use super::{Codec, rgb_offsets, take_slots};
use crate::constants::LENGTH_PREFIX_BITS;
use crate::error::Result;
use crate::framing::{framed_len, read_length};

/// 顺序 1 位方案：按 R、G、B 顺序遍历每个像素，每个样本的最低位存 1 个比特。
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialLsb;

impl Codec for SequentialLsb {
    fn encode(&self, pixels: &mut [u8], bits: &[u8]) -> Result<()> {
        let slots = take_slots(rgb_offsets(pixels.len()), bits.len(), pixels.len())?;

        for (offset, &bit) in slots.into_iter().zip(bits) {
            pixels[offset] = (pixels[offset] & 0xFE) | (bit & 1);
        }
        Ok(())
    }

    fn decode(&self, pixels: &[u8]) -> Result<Vec<u8>> {
        let prefix = take_slots(rgb_offsets(pixels.len()), LENGTH_PREFIX_BITS, pixels.len())?;
        let prefix_bits: Vec<u8> = prefix.iter().map(|&offset| pixels[offset] & 1).collect();

        let needed = framed_len(read_length(&prefix_bits)?);
        let slots = take_slots(rgb_offsets(pixels.len()), needed, pixels.len())?;

        Ok(slots.into_iter().map(|offset| pixels[offset] & 1).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StegoError;
    use crate::framing::{frame, unframe};

    #[test]
    fn writes_only_lowest_bit_in_channel_order() {
        let mut pixels = vec![0xAAu8; 12 * 4];
        let bits = frame(b"");
        SequentialLsb.encode(&mut pixels, &bits).unwrap();

        // 32 个 0 写入前 32 个 RGB 样本，alpha 保持不变
        assert_eq!(pixels[0], 0xAA);
        assert_eq!(pixels[3], 0xAA);
        assert!(pixels.chunks(4).all(|px| px[3] == 0xAA));
    }

    #[test]
    fn round_trip() {
        let mut pixels: Vec<u8> = (0..40 * 4).map(|i| (i * 37 % 256) as u8).collect();
        let bits = frame(b"HI");
        SequentialLsb.encode(&mut pixels, &bits).unwrap();
        let decoded = SequentialLsb.decode(&pixels).unwrap();
        assert_eq!(unframe(&decoded).unwrap(), b"HI");
    }

    #[test]
    fn encode_fails_without_touching_buffer() {
        // 10 个像素只有 30 个 RGB 样本，放不下 32 位长度前缀
        let original = vec![0x55u8; 10 * 4];
        let mut pixels = original.clone();
        let result = SequentialLsb.encode(&mut pixels, &frame(b"x"));
        assert_eq!(
            result,
            Err(StegoError::BufferExhausted {
                needed: 40,
                available: 30
            })
        );
        assert_eq!(pixels, original);
    }

    #[test]
    fn clean_buffer_has_no_message() {
        let pixels = vec![0u8; 100 * 4];
        assert_eq!(SequentialLsb.decode(&pixels), Err(StegoError::NoMessageFound));
    }
}
