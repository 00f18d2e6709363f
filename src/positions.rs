//! # 确定性位置生成器
//!
//! 随机方案使用的线性同余生成器 (LCG) 及由它导出的像素字节偏移序列。
//!
//! 第 `n` 次抽样的值是 `(seed, n)` 的纯函数，编码端和解码端各自重新生成序列，
//! 只要种子相同，两条序列逐位一致。

use std::collections::HashSet;

use crate::constants::{
    BYTES_PER_PIXEL, COLOR_CHANNELS, LCG_INCREMENT, LCG_MODULUS, LCG_MULTIPLIER,
};
use crate::error::{Result, StegoError};

/// 第 `index` 次抽样后的生成器状态 (`index = 0` 为第一次抽样)。
///
/// 通过仿射变换的快速幂直接跳到目标位置，不依赖任何可变的生成器状态，
/// 编码端和解码端因此总是得到同一个值。
pub fn lcg_state(seed: u64, index: u64) -> u64 {
    let (mut acc_mul, mut acc_add) = (1, 0);
    let (mut cur_mul, mut cur_add) = (LCG_MULTIPLIER, LCG_INCREMENT);
    let mut steps = index + 1;

    while steps > 0 {
        if steps & 1 == 1 {
            acc_mul = acc_mul * cur_mul % LCG_MODULUS;
            acc_add = (acc_add * cur_mul + cur_add) % LCG_MODULUS;
        }
        cur_add = (cur_mul + 1) * cur_add % LCG_MODULUS;
        cur_mul = cur_mul * cur_mul % LCG_MODULUS;
        steps >>= 1;
    }

    (acc_mul * (seed % LCG_MODULUS) + acc_add) % LCG_MODULUS
}

/// 第 `index` 次抽样得到的 `[0, 1)` 区间小数。
pub fn lcg_fraction(seed: u64, index: u64) -> f64 {
    lcg_state(seed, index) as f64 / LCG_MODULUS as f64
}

/// 像素缓冲区中 R、G、B 样本的总数。
pub fn rgb_slots(buffer_len: usize) -> usize {
    buffer_len / BYTES_PER_PIXEL * COLOR_CHANNELS
}

/// 把一个 `[0, 1)` 小数映射到缓冲区中的绝对字节偏移。
///
/// 先缩放到只含 RGB 的索引空间，再每 3 个索引补上一个被跳过的 alpha 字节。
fn candidate_offset(fraction: f64, max_pos: usize) -> usize {
    let pos = (fraction * max_pos as f64).floor() as usize;
    pos + pos / COLOR_CHANNELS
}

/// 使用给定种子生成 `count` 个互不相同的 RGB 字节偏移。
///
/// 候选偏移已经出现过或落在 alpha 字节上时被丢弃。
///
/// # Errors
///
/// `count` 超过 RGB 样本数，或生成器跑完一个完整周期仍凑不够 `count` 个偏移时，
/// 返回 [`StegoError::BufferExhausted`]。
pub fn generate_with_seed(seed: u64, buffer_len: usize, count: usize) -> Result<Vec<usize>> {
    let max_pos = rgb_slots(buffer_len);
    if count > max_pos {
        return Err(StegoError::BufferExhausted {
            needed: count,
            available: max_pos,
        });
    }

    let mut seen = HashSet::with_capacity(count);
    let mut positions = Vec::with_capacity(count);

    for index in 0..LCG_MODULUS {
        if positions.len() == count {
            break;
        }
        let offset = candidate_offset(lcg_fraction(seed, index), max_pos);
        if (offset + 1) % BYTES_PER_PIXEL != 0 && seen.insert(offset) {
            positions.push(offset);
        }
    }

    if positions.len() < count {
        return Err(StegoError::BufferExhausted {
            needed: count,
            available: positions.len(),
        });
    }
    Ok(positions)
}

/// 使用固定种子 [`POSITION_SEED`](crate::constants::POSITION_SEED) 生成位置序列。
pub fn generate(buffer_len: usize, count: usize) -> Result<Vec<usize>> {
    generate_with_seed(crate::constants::POSITION_SEED, buffer_len, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::POSITION_SEED;

    /// 一步 LCG 递推。
    fn step(state: u64) -> u64 {
        (state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS
    }

    #[test]
    fn first_states_follow_recurrence() {
        // 12345 * 9301 + 49297 = 114_870_142, mod 233280 = 96_382
        assert_eq!(lcg_state(POSITION_SEED, 0), 96_382);
        assert_eq!(lcg_state(POSITION_SEED, 1), step(96_382));
    }

    #[test]
    fn jump_ahead_matches_iteration() {
        let iterated: Vec<u64> =
            std::iter::successors(Some(step(POSITION_SEED)), |&state| Some(step(state)))
                .take(5_000)
                .collect();
        for (index, &state) in iterated.iter().enumerate() {
            assert_eq!(lcg_state(POSITION_SEED, index as u64), state, "index {index}");
        }
    }

    #[test]
    fn fraction_is_in_unit_interval() {
        for index in 0..1_000 {
            let f = lcg_fraction(POSITION_SEED, index);
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn sequences_are_deterministic() {
        let a = generate(100 * 100 * 4, 1_000).unwrap();
        let b = generate(100 * 100 * 4, 1_000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn longer_sequence_extends_shorter_one() {
        let short = generate(64 * 64 * 4, 200).unwrap();
        let long = generate(64 * 64 * 4, 1_000).unwrap();
        assert_eq!(&long[..200], &short[..]);
    }

    #[test]
    fn positions_are_distinct_rgb_offsets() {
        let len = 50 * 40 * 4;
        let positions = generate(len, 2_000).unwrap();
        let unique: HashSet<_> = positions.iter().collect();
        assert_eq!(unique.len(), positions.len());
        assert!(positions.iter().all(|&p| p < len && (p + 1) % 4 != 0));
    }

    #[test]
    fn too_many_positions_is_exhausted() {
        assert_eq!(
            generate(10 * 10 * 4, 301),
            Err(StegoError::BufferExhausted {
                needed: 301,
                available: 300
            })
        );
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_with_seed(1, 32 * 32 * 4, 64).unwrap();
        let b = generate_with_seed(2, 32 * 32 * 4, 64).unwrap();
        assert_ne!(a, b);
    }
}
