use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fm::FmIndex;
use super::Locate;
use crate::codec::{Codec, CodecError, CodonCodec};

/// 读框复用器：对同一参考序列按相位 0..stride 分别打包并各建一个 FM 索引
/// （stride 为方案的每单元符号数），查询时合并各读框命中并换算回参考坐标。
/// 各读框索引互相独立，由复用器独占。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameIndex<C> {
    seq_len: usize,
    frames: Vec<FmIndex<C>>,
}

impl<C: Codec> FrameIndex<C> {
    pub fn build(codec: C, seq: &[u8], block: usize) -> Result<Self, CodecError> {
        let stride = C::SYMBOLS_PER_UNIT;
        let mut frames = Vec::with_capacity(stride);
        for f in 0..stride {
            let shifted = seq.get(f..).unwrap_or_default();
            let fm = FmIndex::build(codec.clone(), shifted, block)?;
            debug!(frame = f, units = fm.text_len(), "frame index built");
            frames.push(fm);
        }
        Ok(Self { seq_len: seq.len(), frames })
    }

    #[inline]
    pub fn frames(&self) -> &[FmIndex<C>] {
        &self.frames
    }
}

impl FrameIndex<CodonCodec> {
    /// 三读框密码子索引
    pub fn codon(seq: &[u8], block: usize) -> Result<Self, CodecError> {
        Self::build(CodonCodec, seq, block)
    }
}

impl<C: Codec> Locate for FrameIndex<C> {
    fn reference_len(&self) -> usize {
        self.seq_len
    }

    /// 模式串截断为 stride 的整数倍后只打包一次，在每个读框中以相同错配预算查询，
    /// 读框 f 的单元命中 p 换算为 `p * stride + f`。
    fn locate(&self, pattern: &[u8], max_mismatches: usize) -> Result<Vec<usize>, CodecError> {
        let stride = C::SYMBOLS_PER_UNIT;
        let usable = pattern.len() / stride * stride;
        let Some(first) = self.frames.first() else {
            return Ok(Vec::new());
        };
        let pat = first.codec().pack(&pattern[..usable])?;
        if pat.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits = Vec::new();
        for (f, fm) in self.frames.iter().enumerate() {
            hits.extend(fm.locate_units(&pat, max_mismatches).into_iter().map(|p| p * stride + f));
        }
        hits.sort_unstable();
        hits.dedup();
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::PairCodec;

    const REFERENCE: &[u8] = b"TTGACCATGGCATTACGGATCCAGTAGGCTAACGT";

    #[test]
    fn codon_index_has_three_frames() {
        let idx = FrameIndex::codon(REFERENCE, 8).unwrap();
        assert_eq!(idx.frames().len(), 3);
        assert_eq!(idx.reference_len(), REFERENCE.len());
    }

    #[test]
    fn frame_remap_recovers_absolute_offset() {
        let idx = FrameIndex::codon(REFERENCE, 8).unwrap();
        for p in 0..REFERENCE.len() - 9 {
            let pat = &REFERENCE[p..p + 9];
            let hits = idx.locate(pat, 0).unwrap();
            assert!(hits.contains(&p), "offset {} not found in {:?}", p, hits);

            // 只在 p mod 3 读框中命中
            let f = p % 3;
            let packed = CodonCodec.pack(pat).unwrap();
            let unit_hits = idx.frames()[f].locate_units(&packed, 0);
            assert!(unit_hits.contains(&((p - f) / 3)));
        }
    }

    #[test]
    fn pattern_is_truncated_to_whole_triplets() {
        let idx = FrameIndex::codon(REFERENCE, 8).unwrap();
        // "CATGG" -> "CAT"
        let hits = idx.locate(b"CATGG", 0).unwrap();
        assert_eq!(hits, idx.locate(b"CAT", 0).unwrap());
        assert!(hits.contains(&5));
        assert!(idx.locate(b"CA", 0).unwrap().is_empty());
    }

    #[test]
    fn mismatch_budget_counts_codons() {
        let idx = FrameIndex::codon(REFERENCE, 8).unwrap();
        // 参考 6..12 为 ATGGCA，把第二个密码子整体替换
        assert!(!idx.locate(b"ATGTTT", 0).unwrap().contains(&6));
        assert!(idx.locate(b"ATGTTT", 1).unwrap().contains(&6));
    }

    #[test]
    fn pair_frames_reach_odd_offsets() {
        let idx = FrameIndex::build(PairCodec::drop_odd(), REFERENCE, 4).unwrap();
        assert_eq!(idx.frames().len(), 2);
        // 偏移 1 的 "TGAC"
        assert!(idx.locate(b"TGAC", 0).unwrap().contains(&1));
    }

    #[test]
    fn short_reference_yields_empty_frames() {
        let idx = FrameIndex::codon(b"AC", 4).unwrap();
        assert!(idx.locate(b"ACG", 1).unwrap().is_empty());
    }

    #[test]
    fn invalid_reference_symbol_aborts_build() {
        assert!(FrameIndex::codon(b"ACGTNACGT", 4).is_err());
    }
}
