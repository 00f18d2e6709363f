//! # 异或流掩码
//!
//! 用密码对载荷逐字节异或。这不是加密算法：没有认证也没有随机数，
//! 相同的密码和载荷总是得到相同的结果。

/// 将 `data` 的每个字节与 `key[i % key.len()]` 异或。
///
/// 运算是对称的，用同一个密钥再做一次即可还原。`key` 为空时原样返回，
/// 调用方应事先拒绝空密码。
pub fn xor_mask(data: &[u8], key: &[u8]) -> Vec<u8> {
    if key.is_empty() {
        return data.to_vec();
    }
    data.iter()
        .zip(key.iter().cycle())
        .map(|(&byte, &k)| byte ^ k)
        .collect()
}
