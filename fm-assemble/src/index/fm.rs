use serde::{Deserialize, Serialize};

use super::bwt::build_bwt;
use super::rank::RankIndex;
use super::sa::build_sa;
use super::Locate;
use crate::codec::{Codec, CodecError};

/// 回溯搜索中的一个状态：还剩 `remaining` 个模式单元待匹配，
/// 当前 SA 区间为 [l, r)，已用错配数为 `errors`。
#[derive(Debug, Clone, Copy)]
struct SearchState {
    remaining: usize,
    l: usize,
    r: usize,
    errors: usize,
}

/// 以打包方案 `C` 为参数的 FM 索引：
/// - 文本按方案打包并追加一个哨兵单元后构建 SA / BWT / 秩表。
/// - 不保留原始或打包文本，只保存完整 SA 与 BWT 上的秩结构。
/// - 构建后只读，`locate` 只分配局部状态，可并发调用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FmIndex<C> {
    codec: C,
    /// 原始序列长度（符号数）
    seq_len: usize,
    /// 完整 SA（单元坐标）
    sa: Vec<u32>,
    rank: RankIndex,
    /// 近似搜索逐位展开的分支：方案字母表中实际出现在 BWT 里的编码
    branch: Vec<u8>,
}

impl<C: Codec> FmIndex<C> {
    pub fn build(codec: C, seq: &[u8], block: usize) -> Result<Self, CodecError> {
        let text = codec.pack_text(seq)?;
        let sa = build_sa(&text);
        let bwt = build_bwt(&text, &sa);
        let rank = RankIndex::build(bwt, block);
        let branch = codec.unit_alphabet().into_iter().filter(|&k| rank.is_used(k)).collect();
        Ok(Self { codec, seq_len: seq.len(), sa, rank, branch })
    }

    #[inline]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// 打包文本长度 n（含哨兵单元）
    #[inline]
    pub fn text_len(&self) -> usize {
        self.sa.len()
    }

    #[inline]
    pub fn rank(&self) -> &RankIndex {
        &self.rank
    }

    /// 反向搜索精确匹配，pat 为已打包的单元序列（不应包含哨兵）
    pub fn backward_search(&self, pat: &[u8]) -> Option<(usize, usize)> {
        if self.rank.is_empty() || pat.is_empty() {
            return None;
        }
        let mut l = 0usize;
        let mut r = self.rank.len();
        for &a in pat.iter().rev() {
            (l, r) = self.rank.backward_step(a, l, r)?;
        }
        Some((l, r))
    }

    /// 取出 SA 区间对应的单元坐标
    pub fn sa_interval_positions(&self, l: usize, r: usize) -> &[u32] {
        &self.sa[l..r]
    }

    /// 在单元层面做最多 `max_mismatches` 个替换错配的反向回溯搜索，
    /// 返回升序去重的单元坐标。
    pub fn locate_units(&self, pat: &[u8], max_mismatches: usize) -> Vec<usize> {
        if pat.is_empty() || pat.len() >= self.text_len() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        let mut stack = vec![SearchState { remaining: pat.len(), l: 0, r: self.rank.len(), errors: 0 }];
        while let Some(st) = stack.pop() {
            if st.remaining == 0 {
                hits.extend(self.sa[st.l..st.r].iter().map(|&p| p as usize));
                continue;
            }
            let target = pat[st.remaining - 1];
            for &k in &self.branch {
                let errors = st.errors + usize::from(!self.codec.unit_matches(target, k));
                if errors > max_mismatches {
                    continue;
                }
                if let Some((l, r)) = self.rank.backward_step(k, st.l, st.r) {
                    stack.push(SearchState { remaining: st.remaining - 1, l, r, errors });
                }
            }
        }

        hits.sort_unstable();
        hits.dedup();
        hits
    }
}

impl<C: Codec> Locate for FmIndex<C> {
    fn reference_len(&self) -> usize {
        self.seq_len
    }

    /// 打包模式串后搜索，单元坐标乘以每单元符号数换算为序列坐标。
    fn locate(&self, pattern: &[u8], max_mismatches: usize) -> Result<Vec<usize>, CodecError> {
        let pat = self.codec.pack(pattern)?;
        let stride = C::SYMBOLS_PER_UNIT;
        Ok(self
            .locate_units(&pat, max_mismatches)
            .into_iter()
            .map(|p| p * stride)
            .collect())
    }
}
