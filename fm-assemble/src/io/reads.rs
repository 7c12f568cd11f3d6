use anyhow::{Context, Result};
use std::io::Write;

use super::fastq::FastqReader;
use crate::util::dna;

/// 读取 read 集合：
/// - 首个非空白字符为 '@' 时按 FASTQ 解析；
/// - 否则按逗号或换行切分（兼容单行逗号分隔的 reads.txt），空项忽略。
pub fn read_reads(path: &str) -> Result<Vec<Vec<u8>>> {
    let raw = std::fs::read(path).with_context(|| format!("cannot read reads file '{}'", path))?;

    if raw.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'@') {
        let mut reader = FastqReader::new(&raw[..]);
        let mut reads = Vec::new();
        while let Some(rec) = reader.next_record().with_context(|| format!("malformed FASTQ '{}'", path))? {
            reads.push(rec.seq);
        }
        return Ok(reads);
    }

    Ok(raw
        .split(|&b| b == b',' || b == b'\n')
        .map(dna::normalize_seq)
        .filter(|r| !r.is_empty())
        .collect())
}

/// 写出共识序列；path 为 None 时写到 stdout
pub fn write_consensus(path: Option<&str>, consensus: &[u8]) -> Result<()> {
    let mut out: Box<dyn Write> = match path {
        Some(p) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(p).with_context(|| format!("cannot create output '{}'", p))?,
        )),
        None => Box::new(std::io::BufWriter::new(std::io::stdout())),
    };
    out.write_all(consensus)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
