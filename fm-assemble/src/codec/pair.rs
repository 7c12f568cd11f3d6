use serde::{Deserialize, Serialize};

use super::{Codec, CodecError, SENTINEL};

/// 碱基的 4-bit 编码，低 2 位恒为 01，保证任何碱基对都不等于哨兵
const NIBBLE_A: u8 = 0x1;
const NIBBLE_C: u8 = 0x5;
const NIBBLE_G: u8 = 0x9;
const NIBBLE_T: u8 = 0xD;
/// 填充编码，解码为 'N'，不会由输入产生
pub const PAD_NIBBLE: u8 = 0xF;

const BASE_NIBBLES: [u8; 4] = [NIBBLE_A, NIBBLE_C, NIBBLE_G, NIBBLE_T];

/// 奇数长度序列末尾剩下一个碱基时的处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OddTail {
    /// 丢弃最后一个碱基
    #[default]
    DropOdd,
    /// 用填充编码补齐低 4 位
    PadUnknown,
}

/// 每字节两个碱基：高 4 位为前一个碱基，低 4 位为后一个。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCodec {
    pub odd: OddTail,
}

impl PairCodec {
    pub fn drop_odd() -> Self {
        Self { odd: OddTail::DropOdd }
    }

    pub fn pad_unknown() -> Self {
        Self { odd: OddTail::PadUnknown }
    }
}

impl Codec for PairCodec {
    const NAME: &'static str = "pair";
    const SYMBOLS_PER_UNIT: usize = 2;

    #[inline]
    fn encode_symbol(&self, symbol: u8) -> Result<u8, CodecError> {
        match symbol.to_ascii_uppercase() {
            b'A' => Ok(NIBBLE_A),
            b'C' => Ok(NIBBLE_C),
            b'G' => Ok(NIBBLE_G),
            b'T' => Ok(NIBBLE_T),
            _ => Err(CodecError::InvalidSymbol { symbol, scheme: Self::NAME }),
        }
    }

    #[inline]
    fn decode_symbol(&self, code: u8) -> Result<u8, CodecError> {
        match code {
            NIBBLE_A => Ok(b'A'),
            NIBBLE_C => Ok(b'C'),
            NIBBLE_G => Ok(b'G'),
            NIBBLE_T => Ok(b'T'),
            PAD_NIBBLE => Ok(b'N'),
            _ => Err(CodecError::InvalidCode { code, scheme: Self::NAME }),
        }
    }

    fn pack(&self, seq: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(seq.len() / 2 + 1);
        let mut chunks = seq.chunks_exact(2);
        for pair in &mut chunks {
            let hi = self.encode_symbol(pair[0])?;
            let lo = self.encode_symbol(pair[1])?;
            out.push((hi << 4) | lo);
        }
        if let [last] = chunks.remainder() {
            // 被丢弃的碱基同样要求合法
            let hi = self.encode_symbol(*last)?;
            if self.odd == OddTail::PadUnknown {
                out.push((hi << 4) | PAD_NIBBLE);
            }
        }
        Ok(out)
    }

    fn unpack(&self, packed: &[u8]) -> Vec<u8> {
        let mut codes = Vec::with_capacity(packed.len() * 2);
        for &unit in packed {
            if unit == SENTINEL {
                break;
            }
            codes.push(unit >> 4);
            codes.push(unit & 0x0F);
        }
        codes
    }

    fn unit_alphabet(&self) -> Vec<u8> {
        let mut alpha = Vec::with_capacity(20);
        for &hi in &BASE_NIBBLES {
            for &lo in &BASE_NIBBLES {
                alpha.push((hi << 4) | lo);
            }
            if self.odd == OddTail::PadUnknown {
                alpha.push((hi << 4) | PAD_NIBBLE);
            }
        }
        alpha
    }

    /// 低 4 位为填充的查询单元只比较高 4 位的碱基
    #[inline]
    fn unit_matches(&self, query: u8, unit: u8) -> bool {
        if query & 0x0F == PAD_NIBBLE {
            query >> 4 == unit >> 4
        } else {
            query == unit
        }
    }
}
