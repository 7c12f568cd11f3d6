use serde::{Deserialize, Serialize};

use super::{Codec, CodecError, SENTINEL};
use crate::util::dna;

/// 每个单元的低 2 位标记，使任何密码子单元都大于哨兵
const MARKER: u8 = 0b11;

/// 密码子打包：一个字节依次存放三个碱基的 2-bit 编码，低 2 位为标记。
/// 只处理完整的三联体，末尾不足三个的碱基直接丢弃。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodonCodec;

impl Codec for CodonCodec {
    const NAME: &'static str = "codon";
    const SYMBOLS_PER_UNIT: usize = 3;

    #[inline]
    fn encode_symbol(&self, symbol: u8) -> Result<u8, CodecError> {
        dna::base_to_2bit(symbol).ok_or(CodecError::InvalidSymbol { symbol, scheme: Self::NAME })
    }

    #[inline]
    fn decode_symbol(&self, code: u8) -> Result<u8, CodecError> {
        if code > 0b11 {
            return Err(CodecError::InvalidCode { code, scheme: Self::NAME });
        }
        Ok(dna::base_from_2bit(code))
    }

    fn pack(&self, seq: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(seq.len() / 3);
        for triplet in seq.chunks_exact(3) {
            let mut unit = 0u8;
            for &b in triplet {
                unit = (unit << 2) | self.encode_symbol(b)?;
            }
            out.push((unit << 2) | MARKER);
        }
        Ok(out)
    }

    fn unpack(&self, packed: &[u8]) -> Vec<u8> {
        let mut codes = Vec::with_capacity(packed.len() * 3);
        for &unit in packed {
            if unit == SENTINEL {
                break;
            }
            let bits = unit >> 2;
            codes.extend([(bits >> 4) & 0b11, (bits >> 2) & 0b11, bits & 0b11]);
        }
        codes
    }

    fn unit_alphabet(&self) -> Vec<u8> {
        (0u8..64).map(|bits| (bits << 2) | MARKER).collect()
    }
}
