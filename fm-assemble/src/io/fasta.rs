use anyhow::{bail, Context, Result};
use std::io::{BufRead, Read};

use crate::util::dna;

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    peek_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), done: false, peek_header: None }
    }

    fn next_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        if n == 0 {
            self.done = true;
        }
        Ok(n > 0)
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done && self.peek_header.is_none() {
            return Ok(None);
        }

        // 定位 header
        let header = match self.peek_header.take() {
            Some(h) => h,
            None => loop {
                if !self.next_line()? {
                    return Ok(None);
                }
                if let Some(h) = self.buf.strip_prefix('>') {
                    break h.trim().to_string();
                }
            },
        };
        let id = header.split_whitespace().next().unwrap_or("").to_string();

        // 序列行直到下一个 header
        let mut seq: Vec<u8> = Vec::new();
        while self.next_line()? {
            if let Some(h) = self.buf.strip_prefix('>') {
                self.peek_header = Some(h.trim().to_string());
                break;
            }
            seq.extend(dna::normalize_seq(self.buf.as_bytes()));
        }

        Ok(Some(FastaRecord { id, seq }))
    }
}

/// 读取参考序列：以 '>' 开头按 FASTA 解析并拼接所有记录，否则视为纯文本序列。
/// 返回规范化后（去空白、大写）的单条连续序列。
pub fn read_reference(path: &str) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    std::fs::File::open(path)
        .with_context(|| format!("cannot open reference '{}'", path))?
        .read_to_end(&mut raw)
        .with_context(|| format!("cannot read reference '{}'", path))?;

    let seq = if raw.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'>') {
        let mut reader = FastaReader::new(&raw[..]);
        let mut seq = Vec::new();
        while let Some(rec) = reader.next_record()? {
            seq.extend(rec.seq);
        }
        seq
    } else {
        dna::normalize_seq(&raw)
    };

    if seq.is_empty() {
        bail!("reference '{}' contains no sequence", path);
    }
    Ok(seq)
}
