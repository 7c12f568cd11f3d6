use serde::{Deserialize, Serialize};

/// C 表中未出现编码的标记，落在合法累计值范围之外
pub const UNUSED: u32 = u32::MAX;

/// 编码到紧凑槽位映射中的“无槽位”标记
const NO_SLOT: u16 = u16::MAX;

/// BWT 上的秩结构：
/// - C 表按完整字节空间存储，未出现的编码标记为 [`UNUSED`]，近似搜索据此直接跳过分支。
/// - Occ 只为实际出现的编码分配槽位，并按定长分块采样（块内顺扫补偿）；
///   `block == 1` 时等价于 n+1 行的完整 Occ 表。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankIndex {
    block: u32,
    /// C[k] = BWT 中编码 < k 的累计数量；未出现的编码为 UNUSED
    c: Vec<u32>,
    /// 编码 -> Occ 槽位
    slot: Vec<u16>,
    /// 出现过的编码个数（Occ 每行宽度）
    width: u16,
    bwt: Vec<u8>,
    /// Occ 采样（按块存储，行优先展平）：occ_samples[block_id * width + slot]
    occ_samples: Vec<u32>,
}

impl RankIndex {
    pub fn build(bwt: Vec<u8>, block: usize) -> Self {
        let n = bwt.len();
        let block = block.max(1);

        let mut freq = vec![0u32; 256];
        for &ch in &bwt {
            freq[ch as usize] += 1;
        }

        // C 表与槽位
        let mut c = vec![UNUSED; 256];
        let mut slot = vec![NO_SLOT; 256];
        let mut acc = 0u32;
        let mut width = 0u16;
        for code in 0..256 {
            if freq[code] == 0 {
                continue;
            }
            c[code] = acc;
            acc += freq[code];
            slot[code] = width;
            width += 1;
        }

        // 采样 Occ：记录每个块起始位置之前的累计
        let w = width as usize;
        let num_blocks = if n == 0 { 0 } else { (n + block - 1) / block };
        let mut occ_samples = vec![0u32; num_blocks * w];
        let mut running = vec![0u32; w];
        for bi in 0..num_blocks {
            occ_samples[bi * w..(bi + 1) * w].copy_from_slice(&running);
            let start = bi * block;
            let end = ((bi + 1) * block).min(n);
            for &ch in &bwt[start..end] {
                running[slot[ch as usize] as usize] += 1;
            }
        }

        Self { block: block as u32, c, slot, width, bwt, occ_samples }
    }

    /// BWT 长度（含哨兵）
    #[inline]
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    #[inline]
    pub fn bwt(&self) -> &[u8] {
        &self.bwt
    }

    /// C 表原始值，未出现的编码为 [`UNUSED`]
    #[inline]
    pub fn c(&self, code: u8) -> u32 {
        self.c[code as usize]
    }

    #[inline]
    pub fn is_used(&self, code: u8) -> bool {
        self.c[code as usize] != UNUSED
    }

    /// 返回 BWT[0..pos) 中 code 的出现次数
    #[inline]
    pub fn occ(&self, code: u8, pos: usize) -> u32 {
        let s = self.slot[code as usize];
        if pos == 0 || s == NO_SLOT {
            return 0;
        }
        let w = self.width as usize;
        let block = self.block as usize;
        let bi = (pos - 1) / block;
        let base = self.occ_samples[bi * w + s as usize];
        let start = bi * block;
        let add = self.bwt[start..pos].iter().filter(|&&ch| ch == code).count() as u32;
        base + add
    }

    /// LF 映射：C[code] + Occ(code, pos)。调用方保证 code 在 BWT 中出现过。
    #[inline]
    pub fn lf(&self, code: u8, pos: usize) -> usize {
        self.c[code as usize] as usize + self.occ(code, pos) as usize
    }

    /// 反向搜索单步：在区间 [l, r) 前方扩展 code。
    /// 编码未出现或新区间为空时返回 None。
    #[inline]
    pub fn backward_step(&self, code: u8, l: usize, r: usize) -> Option<(usize, usize)> {
        if !self.is_used(code) {
            return None;
        }
        let nl = self.lf(code, l);
        let nr = self.lf(code, r);
        (nl < nr).then_some((nl, nr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{bwt::build_bwt, sa::build_sa};

    fn rank_of(seq: &[u8], block: usize) -> RankIndex {
        let mut text = seq.to_vec();
        text.push(0);
        let sa = build_sa(&text);
        RankIndex::build(build_bwt(&text, &sa), block)
    }

    #[test]
    fn c_table_marks_unused_codes() {
        let rank = rank_of(b"ACGTACGT", 4);
        assert_eq!(rank.c(0), 0);
        assert_eq!(rank.c(b'A'), 1);
        assert_eq!(rank.c(b'C'), 3);
        assert_eq!(rank.c(b'G'), 5);
        assert_eq!(rank.c(b'T'), 7);
        assert_eq!(rank.c(b'N'), UNUSED);
        assert!(!rank.is_used(b'N'));
        assert_eq!(rank.occ(b'N', rank.len()), 0);
    }

    #[test]
    fn sampled_occ_matches_full_scan() {
        let seq = b"GATTACAGATTACACCGGTTAAGCTAGCTAGGCTTACG";
        for block in [1usize, 3, 8, 64] {
            let rank = rank_of(seq, block);
            for code in [0u8, b'A', b'C', b'G', b'T'] {
                for pos in 0..=rank.len() {
                    let expected = rank.bwt()[..pos].iter().filter(|&&c| c == code).count() as u32;
                    assert_eq!(rank.occ(code, pos), expected, "block={} code={} pos={}", block, code, pos);
                }
            }
        }
    }

    #[test]
    fn backward_step_narrows_interval() {
        let rank = rank_of(b"ACGTACGT", 2);
        let (l, r) = rank.backward_step(b'T', 0, rank.len()).unwrap();
        assert_eq!(r - l, 2);
        let (l, r) = rank.backward_step(b'G', l, r).unwrap();
        assert_eq!(r - l, 2);
        assert!(rank.backward_step(b'A', l, r).is_none());
        assert!(rank.backward_step(b'N', 0, rank.len()).is_none());
    }

    #[test]
    fn empty_bwt_builds() {
        let rank = RankIndex::build(Vec::new(), 16);
        assert!(rank.is_empty());
        assert_eq!(rank.occ(b'A', 0), 0);
    }
}
