use super::rank::RankIndex;
use crate::codec::SENTINEL;

/// 根据后缀数组构建 BWT：`BWT[i] = text[(SA[i] - 1 + n) mod n]`。
pub fn build_bwt(text: &[u8], sa: &[u32]) -> Vec<u8> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut bwt = Vec::with_capacity(n);
    for &p in sa {
        let i = p as usize;
        let prev = if i == 0 { text[n - 1] } else { text[i - 1] };
        bwt.push(prev);
    }
    bwt
}

/// 通过 LF 映射从 BWT 还原打包文本（含末尾哨兵）。
/// 第 0 行对应仅由哨兵组成的后缀，从它出发逆向走 n-1 步。
pub fn invert_bwt(rank: &RankIndex) -> Vec<u8> {
    let n = rank.len();
    if n == 0 {
        return Vec::new();
    }
    let mut text = vec![SENTINEL; n];
    let mut row = 0usize;
    for k in (0..n - 1).rev() {
        let c = rank.bwt()[row];
        text[k] = c;
        row = rank.lf(c, row);
    }
    text
}
