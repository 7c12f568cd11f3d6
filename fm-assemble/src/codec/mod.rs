//! 字母表编码器：符号 <-> 编码的映射，以及把序列打包成定宽编码单元。
//!
//! 三种打包方案共用 [`Codec`] trait：
//!
//! - [`RawCodec`]：每个符号占一个字节，字母表为整个字节空间（除哨兵 0）
//! - [`PairCodec`]：4-bit 编码，每字节两个碱基，奇数长度的处理策略见 [`OddTail`]
//! - [`CodonCodec`]：每字节三个碱基（各 2 bit），低 2 位固定为 `0b11`
//!
//! 所有方案的哨兵单元都是 [`SENTINEL`]（0），严格小于任何合法单元编码。

use thiserror::Error;

pub mod codon;
pub mod pair;
pub mod raw;

pub use codon::CodonCodec;
pub use pair::{OddTail, PairCodec};
pub use raw::RawCodec;

/// 哨兵单元，追加在被索引文本末尾，且只出现一次
pub const SENTINEL: u8 = 0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid symbol {:?} (0x{symbol:02X}) for {scheme} packing", symbol_char(.symbol))]
    InvalidSymbol { symbol: u8, scheme: &'static str },
    #[error("invalid code 0x{code:02X} for {scheme} packing")]
    InvalidCode { code: u8, scheme: &'static str },
}

fn symbol_char(b: &u8) -> char {
    char::from(*b)
}

pub trait Codec: Clone + Send + Sync {
    /// 方案名称（用于错误信息与日志）
    const NAME: &'static str;
    /// 每个打包单元包含的符号数，也是单元坐标到序列坐标的倍数
    const SYMBOLS_PER_UNIT: usize;

    /// 单个符号 -> 符号编码
    fn encode_symbol(&self, symbol: u8) -> Result<u8, CodecError>;

    /// 单个符号编码 -> 符号
    fn decode_symbol(&self, code: u8) -> Result<u8, CodecError>;

    /// 打包序列（不含哨兵）
    fn pack(&self, seq: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// 拆包为符号编码序列，遇到第一个哨兵单元即停止
    fn unpack(&self, packed: &[u8]) -> Vec<u8>;

    /// 所有可能出现的非哨兵单元编码，即近似搜索时逐位展开的分支集合
    fn unit_alphabet(&self) -> Vec<u8>;

    /// 查询单元 `query` 与文本单元 `unit` 是否视为相同（不计错配）
    #[inline]
    fn unit_matches(&self, query: u8, unit: u8) -> bool {
        query == unit
    }

    /// 打包并在末尾追加一个哨兵单元，作为建索引的文本
    fn pack_text(&self, seq: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut text = self.pack(seq)?;
        text.push(SENTINEL);
        Ok(text)
    }

    /// 还原为可显示的字符串（对应原始序列，遇到哨兵即停止）
    fn to_text(&self, packed: &[u8]) -> Result<String, CodecError> {
        let codes = self.unpack(packed);
        let mut out = String::with_capacity(codes.len());
        for code in codes {
            out.push(char::from(self.decode_symbol(code)?));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_symbol_message_names_scheme() {
        let err = CodecError::InvalidSymbol { symbol: b'X', scheme: "codon" };
        let msg = err.to_string();
        assert!(msg.contains("'X'"), "{}", msg);
        assert!(msg.contains("codon"), "{}", msg);
    }

    #[test]
    fn pack_text_appends_single_sentinel() {
        let text = RawCodec.pack_text(b"ACGT").unwrap();
        assert_eq!(text, b"ACGT\0");
        let text = PairCodec::default().pack_text(b"ACGT").unwrap();
        assert_eq!(text.len(), 3);
        assert_eq!(text.iter().filter(|&&u| u == SENTINEL).count(), 1);
    }
}
