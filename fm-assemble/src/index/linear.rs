use super::Locate;
use crate::codec::CodecError;

/// 暴力扫描基线：逐位置计算 Hamming 距离。
/// 与 FM 索引实现同一个 [`Locate`] 接口，用于对照测试与小数据映射。
#[derive(Debug, Clone)]
pub struct LinearScan {
    reference: Vec<u8>,
}

impl LinearScan {
    pub fn new(reference: &[u8]) -> Self {
        Self { reference: reference.to_vec() }
    }
}

impl Locate for LinearScan {
    fn reference_len(&self) -> usize {
        self.reference.len()
    }

    fn locate(&self, pattern: &[u8], max_mismatches: usize) -> Result<Vec<usize>, CodecError> {
        let m = pattern.len();
        if m == 0 || m > self.reference.len() {
            return Ok(Vec::new());
        }
        let hits = self
            .reference
            .windows(m)
            .enumerate()
            .filter(|(_, w)| {
                let mut errors = 0usize;
                for (a, b) in w.iter().zip(pattern) {
                    if a != b {
                        errors += 1;
                        if errors > max_mismatches {
                            return false;
                        }
                    }
                }
                true
            })
            .map(|(i, _)| i)
            .collect();
        Ok(hits)
    }
}
