use super::{Codec, take_slots};
use crate::constants::{BYTES_PER_PIXEL, LENGTH_PREFIX_BITS};
use crate::error::Result;
use crate::framing::{framed_len, read_length};

/// 每个字节承载的比特数。
const BITS_PER_SLOT: usize = 2;

/// 顺序 2 位方案：与顺序 1 位方案遍历顺序相同，但每个样本的低 2 位存 2 个比特。
///
/// 长度前缀同样按 2 位一组写入，只占用 16 个字节。
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialLsb2;

/// 按原始字节偏移前进，遇到下一个是 alpha 字节时再多跳一步。
fn byte_offsets(buffer_len: usize) -> impl Iterator<Item = usize> {
    std::iter::successors(Some(0usize), |&offset| {
        let mut next = offset + 1;
        if (next + 1) % BYTES_PER_PIXEL == 0 {
            next += 1;
        }
        Some(next)
    })
    .take_while(move |&offset| offset < buffer_len)
}

impl Codec for SequentialLsb2 {
    fn encode(&self, pixels: &mut [u8], bits: &[u8]) -> Result<()> {
        let needed = bits.len().div_ceil(BITS_PER_SLOT);
        let slots = take_slots(byte_offsets(pixels.len()), needed, pixels.len())?;

        for (offset, pair) in slots.into_iter().zip(bits.chunks(BITS_PER_SLOT)) {
            // 奇数个比特时末尾补 0
            let high = pair[0] & 1;
            let low = pair.get(1).map_or(0, |bit| bit & 1);
            pixels[offset] = ((high << 1) | low) | (pixels[offset] & 0xFC);
        }
        Ok(())
    }

    fn decode(&self, pixels: &[u8]) -> Result<Vec<u8>> {
        let read = |count: usize| -> Result<Vec<u8>> {
            let slots = take_slots(byte_offsets(pixels.len()), count, pixels.len())?;
            Ok(slots
                .into_iter()
                .flat_map(|offset| {
                    let value = pixels[offset] & 0x3;
                    [(value >> 1) & 1, value & 1]
                })
                .collect())
        };

        let prefix = read(LENGTH_PREFIX_BITS / BITS_PER_SLOT)?;
        let needed = framed_len(read_length(&prefix)?);

        let mut bits = read(needed.div_ceil(BITS_PER_SLOT))?;
        bits.truncate(needed);
        Ok(bits)
    }
}
