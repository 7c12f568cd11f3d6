//! 索引构建与查询：后缀数组、BWT、秩表、FM 索引、读框复用器与暴力基线。

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::codec::{CodecError, CodonCodec, PairCodec, RawCodec};

pub mod bwt;
pub mod fm;
pub mod frame;
pub mod linear;
pub mod rank;
pub mod sa;

pub use fm::FmIndex;
pub use frame::FrameIndex;
pub use linear::LinearScan;

/// 允许替换错配的定位接口，read 映射只依赖这一层。
pub trait Locate: Sync {
    /// 被索引的参考序列长度（符号数）
    fn reference_len(&self) -> usize;

    /// 返回所有与模式串错配数不超过 `max_mismatches` 的起始偏移（序列坐标），
    /// 升序且去重。错配按打包单元计数：字节方案即逐碱基的 Hamming 距离，
    /// 碱基对与密码子方案中一个单元内无论几个碱基不同都只算一个错配。
    /// 空模式或超长模式返回空结果；非法符号返回错误。
    fn locate(&self, pattern: &[u8], max_mismatches: usize) -> Result<Vec<usize>, CodecError>;
}

/// 打包方案选择
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Scheme {
    /// 字节粒度，完整字节字母表
    #[default]
    Raw,
    /// 每字节两个碱基，奇数末尾碱基丢弃
    Pair,
    /// 每字节两个碱基，奇数末尾用填充编码补齐
    PairPad,
    /// 每字节三个碱基，三读框复用
    Codon,
}

impl Scheme {
    pub fn name(self) -> &'static str {
        match self {
            Scheme::Raw => "raw",
            Scheme::Pair => "pair",
            Scheme::PairPad => "pair-pad",
            Scheme::Codon => "codon",
        }
    }
}

/// 按运行时选择的方案构建的索引
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnyIndex {
    Raw(FmIndex<RawCodec>),
    Pair(FmIndex<PairCodec>),
    Codon(FrameIndex<CodonCodec>),
}

impl AnyIndex {
    pub fn build(scheme: Scheme, seq: &[u8], block: usize) -> Result<Self, CodecError> {
        Ok(match scheme {
            Scheme::Raw => AnyIndex::Raw(FmIndex::build(RawCodec, seq, block)?),
            Scheme::Pair => AnyIndex::Pair(FmIndex::build(PairCodec::drop_odd(), seq, block)?),
            Scheme::PairPad => AnyIndex::Pair(FmIndex::build(PairCodec::pad_unknown(), seq, block)?),
            Scheme::Codon => AnyIndex::Codon(FrameIndex::codon(seq, block)?),
        })
    }

    pub fn scheme(&self) -> Scheme {
        match self {
            AnyIndex::Raw(_) => Scheme::Raw,
            AnyIndex::Pair(fm) if fm.codec().odd == crate::codec::OddTail::PadUnknown => Scheme::PairPad,
            AnyIndex::Pair(_) => Scheme::Pair,
            AnyIndex::Codon(_) => Scheme::Codon,
        }
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let f = std::io::BufWriter::new(std::fs::File::create(path)?);
        bincode::serialize_into(f, self)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let f = std::io::BufReader::new(std::fs::File::open(path)?);
        let idx: Self = bincode::deserialize_from(f)?;
        Ok(idx)
    }
}

impl Locate for AnyIndex {
    fn reference_len(&self) -> usize {
        match self {
            AnyIndex::Raw(fm) => fm.reference_len(),
            AnyIndex::Pair(fm) => fm.reference_len(),
            AnyIndex::Codon(fi) => fi.reference_len(),
        }
    }

    fn locate(&self, pattern: &[u8], max_mismatches: usize) -> Result<Vec<usize>, CodecError> {
        match self {
            AnyIndex::Raw(fm) => fm.locate(pattern, max_mismatches),
            AnyIndex::Pair(fm) => fm.locate(pattern, max_mismatches),
            AnyIndex::Codon(fi) => fi.locate(pattern, max_mismatches),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_index_reports_its_scheme() {
        for scheme in [Scheme::Raw, Scheme::Pair, Scheme::PairPad, Scheme::Codon] {
            let idx = AnyIndex::build(scheme, b"ACGTACGTAC", 4).unwrap();
            assert_eq!(idx.scheme(), scheme);
            assert_eq!(idx.reference_len(), 10);
        }
    }

    #[test]
    fn every_scheme_finds_aligned_exact_match() {
        let reference = b"TTGACCATGGCATTACGGATCC";
        for scheme in [Scheme::Raw, Scheme::Pair, Scheme::PairPad, Scheme::Codon] {
            let idx = AnyIndex::build(scheme, reference, 4).unwrap();
            // 偏移 6 对所有方案的单元边界都对齐
            let hits = idx.locate(&reference[6..12], 0).unwrap();
            assert!(hits.contains(&6), "{}: {:?}", scheme.name(), hits);
        }
    }

    #[test]
    fn any_index_persists_with_bincode() {
        let idx = AnyIndex::build(Scheme::Codon, b"ACGTTGCAACGT", 2).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idx.fm");
        let path = path.to_str().unwrap();
        idx.save_to_file(path).unwrap();
        let loaded = AnyIndex::load_from_file(path).unwrap();
        assert_eq!(loaded.scheme(), Scheme::Codon);
        assert_eq!(loaded.locate(b"GCAACG", 0).unwrap(), idx.locate(b"GCAACG", 0).unwrap());
    }
}
