use serde::{Deserialize, Serialize};

use super::{Codec, CodecError, SENTINEL};

/// 字节粒度方案：符号即编码，字母表覆盖 1..=255。
/// 输入中的 0 与哨兵冲突，视为非法符号。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCodec;

impl Codec for RawCodec {
    const NAME: &'static str = "raw";
    const SYMBOLS_PER_UNIT: usize = 1;

    #[inline]
    fn encode_symbol(&self, symbol: u8) -> Result<u8, CodecError> {
        if symbol == SENTINEL {
            return Err(CodecError::InvalidSymbol { symbol, scheme: Self::NAME });
        }
        Ok(symbol)
    }

    #[inline]
    fn decode_symbol(&self, code: u8) -> Result<u8, CodecError> {
        if code == SENTINEL {
            return Err(CodecError::InvalidCode { code, scheme: Self::NAME });
        }
        Ok(code)
    }

    fn pack(&self, seq: &[u8]) -> Result<Vec<u8>, CodecError> {
        seq.iter().map(|&b| self.encode_symbol(b)).collect()
    }

    fn unpack(&self, packed: &[u8]) -> Vec<u8> {
        packed.iter().copied().take_while(|&u| u != SENTINEL).collect()
    }

    fn unit_alphabet(&self) -> Vec<u8> {
        (1..=u8::MAX).collect()
    }
}
