//! read 映射与多数投票共识装配。

use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::index::{AnyIndex, Locate, Scheme};

pub mod vote;

pub use vote::VoteTable;

/// 装配参数
#[derive(Debug, Clone, Copy)]
pub struct AssembleOpt {
    pub scheme: Scheme,
    /// 每条 read 允许的最大替换错配数（按打包单元计）
    pub max_mismatches: usize,
    /// 映射线程数，0 表示使用 rayon 默认值
    pub threads: usize,
    /// Occ 采样间隔
    pub occ_block: usize,
}

impl Default for AssembleOpt {
    fn default() -> Self {
        Self { scheme: Scheme::Raw, max_mismatches: 0, threads: 0, occ_block: 64 }
    }
}

/// 各阶段耗时（毫秒）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timings {
    pub build_ms: u64,
    pub map_ms: u64,
    pub assemble_ms: u64,
}

impl Timings {
    pub fn total_ms(&self) -> u64 {
        self.build_ms + self.map_ms + self.assemble_ms
    }

    /// 纯文本耗时报告，首行为 RFC 3339 时间戳
    pub fn report(&self) -> String {
        format!(
            "# {}\nFM-index build time     : {} ms\nRead mapping time       : {} ms\nConsensus assembly time : {} ms\nTotal pipeline time     : {} ms\n",
            chrono::Utc::now().to_rfc3339(),
            self.build_ms,
            self.map_ms,
            self.assemble_ms,
            self.total_ms(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct Assembly {
    pub consensus: Vec<u8>,
    /// 至少有一个命中计入投票的 read 数
    pub mapped_reads: usize,
    pub timings: Timings,
}

/// 并行映射所有 read，结果与输入顺序一一对应。
pub fn map_reads<L: Locate + ?Sized>(
    locator: &L,
    reads: &[Vec<u8>],
    max_mismatches: usize,
    threads: usize,
) -> Result<Vec<Vec<usize>>> {
    let run = || {
        reads
            .par_iter()
            .enumerate()
            .map(|(i, read)| {
                locator
                    .locate(read, max_mismatches)
                    .with_context(|| format!("read #{} cannot be encoded", i))
            })
            .collect::<Result<Vec<_>>>()
    };
    if threads == 0 {
        return run();
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("cannot build mapping thread pool")?;
    pool.install(run)
}

/// 按映射结果投票，返回共识序列与实际计票的 read 数。
pub fn vote_consensus(ref_len: usize, reads: &[Vec<u8>], hits: &[Vec<usize>]) -> (Vec<u8>, usize) {
    let mut votes = VoteTable::new(ref_len);
    let mut mapped = 0usize;
    let mut skipped = 0usize;
    for (read, positions) in reads.iter().zip(hits) {
        let mut counted = false;
        for &pos in positions {
            if votes.add(read, pos) {
                counted = true;
            } else {
                skipped += 1;
            }
        }
        mapped += usize::from(counted);
    }
    if skipped > 0 {
        debug!(skipped, "overhanging alignments ignored");
    }
    (votes.into_consensus(), mapped)
}

/// 用已构建的索引完成映射与投票（不含建索引耗时）。
pub fn assemble_with<L: Locate + ?Sized>(
    locator: &L,
    reads: &[Vec<u8>],
    max_mismatches: usize,
    threads: usize,
) -> Result<Assembly> {
    let t_map = Instant::now();
    let hits = map_reads(locator, reads, max_mismatches, threads)?;
    let map_ms = t_map.elapsed().as_millis() as u64;
    info!(reads = reads.len(), map_ms, "reads mapped");

    let t_asm = Instant::now();
    let (consensus, mapped_reads) = vote_consensus(locator.reference_len(), reads, &hits);
    let assemble_ms = t_asm.elapsed().as_millis() as u64;
    info!(mapped_reads, assemble_ms, "consensus assembled");

    Ok(Assembly { consensus, mapped_reads, timings: Timings { build_ms: 0, map_ms, assemble_ms } })
}

/// 完整流程：建索引 -> 映射 -> 投票。
pub fn assemble(reference: &[u8], reads: &[Vec<u8>], opt: &AssembleOpt) -> Result<Assembly> {
    let t_build = Instant::now();
    let index = AnyIndex::build(opt.scheme, reference, opt.occ_block)
        .with_context(|| format!("cannot build {} index over reference", opt.scheme.name()))?;
    let build_ms = t_build.elapsed().as_millis() as u64;
    info!(scheme = opt.scheme.name(), ref_len = reference.len(), build_ms, "index built");

    let mut assembly = assemble_with(&index, reads, opt.max_mismatches, opt.threads)?;
    assembly.timings.build_ms = build_ms;
    Ok(assembly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::LinearScan;

    fn reads(list: &[&[u8]]) -> Vec<Vec<u8>> {
        list.iter().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn tie_breaks_to_lowest_code_with_one_mismatch() {
        let opt = AssembleOpt { max_mismatches: 1, ..AssembleOpt::default() };
        let asm = assemble(b"ACGTACGT", &reads(&[b"ACGT", b"ACGA"]), &opt).unwrap();
        // 两条 read 都命中 0 和 4，第 3、7 列 T/A 平票
        assert_eq!(asm.consensus, b"ACGAACGA");
        assert_eq!(asm.mapped_reads, 2);
    }

    #[test]
    fn majority_overrides_minority_read() {
        let opt = AssembleOpt { max_mismatches: 1, ..AssembleOpt::default() };
        let asm = assemble(b"ACGTACGT", &reads(&[b"ACGT", b"ACGT", b"ACGA"]), &opt).unwrap();
        assert_eq!(asm.consensus, b"ACGTACGT");
    }

    #[test]
    fn unmapped_reads_leave_no_call() {
        let opt = AssembleOpt::default();
        let asm = assemble(b"ACGTTTTT", &reads(&[b"ACG", b"GGGG"]), &opt).unwrap();
        assert_eq!(asm.consensus, b"ACGNNNNN");
        assert_eq!(asm.mapped_reads, 1);
    }

    #[test]
    fn map_reads_preserves_order_and_honours_thread_count() {
        let scan = LinearScan::new(b"ACGTACGTAA");
        let rs = reads(&[b"AA", b"ACGT", b"TTT"]);
        let single = map_reads(&scan, &rs, 0, 1).unwrap();
        let pooled = map_reads(&scan, &rs, 0, 0).unwrap();
        assert_eq!(single, vec![vec![8], vec![0, 4], vec![]]);
        assert_eq!(single, pooled);
    }

    #[test]
    fn invalid_read_symbol_aborts_mapping() {
        let opt = AssembleOpt { scheme: Scheme::Codon, ..AssembleOpt::default() };
        let err = assemble(b"ACGTACGTACGT", &reads(&[b"ACG", b"AXG"]), &opt).unwrap_err();
        assert!(format!("{:#}", err).contains("read #1"), "{:#}", err);
    }

    #[test]
    fn codon_scheme_reaches_every_offset() {
        let reference = b"GATTACAGGCTTACGATCGA";
        let rs: Vec<Vec<u8>> = (0..=reference.len() - 6).map(|p| reference[p..p + 6].to_vec()).collect();
        let opt = AssembleOpt { scheme: Scheme::Codon, ..AssembleOpt::default() };
        let asm = assemble(reference, &rs, &opt).unwrap();
        assert_eq!(asm.consensus, reference);
    }

    #[test]
    fn timing_report_lists_all_stages() {
        let t = Timings { build_ms: 3, map_ms: 5, assemble_ms: 2 };
        assert_eq!(t.total_ms(), 10);
        let report = t.report();
        assert!(report.contains("FM-index build time     : 3 ms"));
        assert!(report.contains("Total pipeline time     : 10 ms"));
    }
}
