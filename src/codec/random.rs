use super::Codec;
use crate::constants::{LENGTH_PREFIX_BITS, RANDOM_DECODE_POSITIONS};
use crate::error::{Result, StegoError};
use crate::framing::{framed_len, read_length};
use crate::positions::{self, rgb_slots};

/// 随机 1 位方案：按确定性伪随机位置序列，每个位置的最低位存 1 个比特。
///
/// 前 32 个位置存长度前缀，其余存载荷。容量与顺序 1 位方案相同。
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomLsb;

impl Codec for RandomLsb {
    fn encode(&self, pixels: &mut [u8], bits: &[u8]) -> Result<()> {
        let positions = positions::generate(pixels.len(), bits.len())?;

        for (offset, &bit) in positions.into_iter().zip(bits) {
            pixels[offset] = (pixels[offset] & 0xFE) | (bit & 1);
        }
        Ok(())
    }

    fn decode(&self, pixels: &[u8]) -> Result<Vec<u8>> {
        // 解码端不知道消息长度，先生成固定数量的位置，只用需要的前缀
        let initial = RANDOM_DECODE_POSITIONS.min(rgb_slots(pixels.len()));
        if initial < LENGTH_PREFIX_BITS {
            return Err(StegoError::BufferExhausted {
                needed: LENGTH_PREFIX_BITS,
                available: initial,
            });
        }
        let mut positions = positions::generate(pixels.len(), initial)?;

        let prefix: Vec<u8> = positions[..LENGTH_PREFIX_BITS]
            .iter()
            .map(|&offset| pixels[offset] & 1)
            .collect();
        let needed = framed_len(read_length(&prefix)?);

        if needed > positions.len() {
            // 同一个种子生成的更长序列以原序列为前缀
            positions = positions::generate(pixels.len(), needed)?;
        }

        Ok(positions[..needed]
            .iter()
            .map(|&offset| pixels[offset] & 1)
            .collect())
    }
}
