use crate::util::dna::NO_CALL;

/// 每个位置一行计数，覆盖完整字节空间
const WIDTH: usize = 256;

/// 逐位置多数投票表。每次装配新建一个，消费一次得到共识序列。
#[derive(Debug, Clone)]
pub struct VoteTable {
    len: usize,
    /// counts[pos * WIDTH + symbol]
    counts: Vec<u32>,
}

impl VoteTable {
    pub fn new(len: usize) -> Self {
        Self { len, counts: vec![0; len * WIDTH] }
    }

    /// 把 read 在偏移 `pos` 处的每个字符计入对应列。
    /// 越过参考末尾的比对整体忽略，返回是否计入。
    pub fn add(&mut self, read: &[u8], pos: usize) -> bool {
        match pos.checked_add(read.len()) {
            Some(end) if end <= self.len => {}
            _ => return false,
        }
        for (j, &b) in read.iter().enumerate() {
            self.counts[(pos + j) * WIDTH + b as usize] += 1;
        }
        true
    }

    #[inline]
    pub fn count(&self, pos: usize, symbol: u8) -> u32 {
        self.counts[pos * WIDTH + symbol as usize]
    }

    /// 逐列取票数最多的符号；平票时取编码最小者，无票位置输出 `N`。
    pub fn into_consensus(self) -> Vec<u8> {
        self.counts
            .chunks_exact(WIDTH)
            .map(|column| {
                let mut best = NO_CALL;
                let mut best_count = 0u32;
                for (symbol, &c) in column.iter().enumerate() {
                    if c > best_count {
                        best = symbol as u8;
                        best_count = c;
                    }
                }
                best
            })
            .collect()
    }
}
