use anyhow::{anyhow, Result};
use std::io::BufRead;

use crate::util::dna;

/// FASTQ 记录；质量值只用于格式校验，投票不做质量加权
#[derive(Debug, Clone)]
pub struct FastqRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

pub struct FastqReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    line_no: usize,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), done: false, line_no: 0 }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        self.line_no += 1;
        Ok(n > 0)
    }

    pub fn next_record(&mut self) -> Result<Option<FastqRecord>> {
        if self.done { return Ok(None); }

        // header line starting with '@'，跳过空行
        loop {
            if !self.read_line()? { self.done = true; return Ok(None); }
            if !self.buf.trim().is_empty() { break; }
        }
        let header = self.buf.strip_prefix('@')
            .ok_or_else(|| anyhow!("line {}: FASTQ header not starting with '@'", self.line_no))?;
        let id = header.split_whitespace().next().unwrap_or("").to_string();

        // sequence line
        if !self.read_line()? { return Err(anyhow!("line {}: unexpected EOF after header", self.line_no)); }
        let seq = dna::normalize_seq(self.buf.as_bytes());

        // plus line
        if !self.read_line()? || !self.buf.starts_with('+') {
            return Err(anyhow!("line {}: missing '+' line", self.line_no));
        }

        // quality line
        if !self.read_line()? { return Err(anyhow!("line {}: missing quality line", self.line_no)); }
        let qual_len = self.buf.trim_end().len();
        if qual_len != seq.len() {
            return Err(anyhow!("line {}: seq/qual length mismatch ({} vs {})", self.line_no, seq.len(), qual_len));
        }

        Ok(Some(FastqRecord { id, seq }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_two_records() {
        let data = b"@r1 extra\nacgt\n+\nIIII\n\n@r2\nGG\n+r2\n##\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));
        let a = r.next_record().unwrap().unwrap();
        assert_eq!(a.id, "r1");
        assert_eq!(a.seq, b"ACGT");
        let b = r.next_record().unwrap().unwrap();
        assert_eq!(b.id, "r2");
        assert_eq!(b.seq, b"GG");
        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn reject_length_mismatch() {
        let data = b"@r1\nACGT\n+\nII\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));
        let err = r.next_record().unwrap_err();
        assert!(err.to_string().contains("length mismatch"));
    }

    #[test]
    fn reject_missing_plus_line() {
        let data = b"@r1\nACGT\nIIII\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));
        assert!(r.next_record().is_err());
    }
}
