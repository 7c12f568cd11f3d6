/// 2-bit 编码顺序下的四种碱基 {0:A, 1:C, 2:G, 3:T}
pub const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// 共识序列中无投票位置的占位符
pub const NO_CALL: u8 = b'N';

#[inline]
pub fn base_to_2bit(b: u8) -> Option<u8> {
    match b.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

#[inline]
pub fn base_from_2bit(code: u8) -> u8 {
    BASES[(code & 0b11) as usize]
}

/// 规范化输入序列：去掉空白、转为大写、U 视为 T。
/// 其它字符原样保留，由编码器决定是否报错。
pub fn normalize_seq(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq {
        if b.is_ascii_whitespace() {
            continue;
        }
        let up = b.to_ascii_uppercase();
        out.push(if up == b'U' { b'T' } else { up });
    }
    out
}
