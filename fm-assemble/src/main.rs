use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use fm_assemble::assemble::{self, AssembleOpt};
use fm_assemble::index::{AnyIndex, Locate, Scheme};
use fm_assemble::io;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "fm-assemble", author, version, about = "FM-index read mapping with mismatches and majority-vote consensus", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build an FM index over the reference and save it
    Index {
        /// Reference file (FASTA or plain sequence)
        reference: String,
        /// Output prefix; the index is written to <prefix>.fm
        #[arg(short, long, default_value = "ref")]
        output: String,
        #[arg(short, long, value_enum, default_value_t = Scheme::Raw)]
        scheme: Scheme,
        /// Occ sampling interval
        #[arg(long = "occ-block", default_value_t = 64)]
        occ_block: usize,
    },
    /// Map reads onto the reference and emit the majority-vote consensus
    Assemble {
        /// Reads file (comma/line separated or FASTQ)
        reads: String,
        /// Reference file (FASTA or plain sequence)
        #[arg(short, long, required_unless_present = "index", conflicts_with = "index")]
        reference: Option<String>,
        /// Prebuilt index (.fm) from the `index` subcommand
        #[arg(short, long)]
        index: Option<String>,
        /// Output consensus path (stdout if omitted)
        #[arg(short, long)]
        out: Option<String>,
        /// Packing scheme (a saved index carries its own)
        #[arg(short, long, value_enum, default_value_t = Scheme::Raw, conflicts_with = "index")]
        scheme: Scheme,
        /// Maximum substitution mismatches per read
        #[arg(short = 'k', long = "max-mismatches", default_value_t = 0)]
        max_mismatches: usize,
        /// Mapping threads (0 = rayon default)
        #[arg(short = 't', long = "threads", default_value_t = 0)]
        threads: usize,
        #[arg(long = "occ-block", default_value_t = 64, conflicts_with = "index")]
        occ_block: usize,
        /// Write a timing report to this file
        #[arg(long)]
        timing: Option<String>,
    },
    /// Print every offset where a pattern occurs within the mismatch budget
    Locate {
        /// Reference file (FASTA or plain sequence)
        reference: String,
        /// Query pattern
        pattern: String,
        #[arg(short, long, value_enum, default_value_t = Scheme::Raw)]
        scheme: Scheme,
        #[arg(short = 'k', long = "max-mismatches", default_value_t = 0)]
        max_mismatches: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Index { reference, output, scheme, occ_block } => run_index(&reference, &output, scheme, occ_block),
        Commands::Assemble { reads, reference, index, out, scheme, max_mismatches, threads, occ_block, timing } => {
            let opt = AssembleOpt { scheme, max_mismatches, threads, occ_block };
            run_assemble(&reads, reference.as_deref(), index.as_deref(), out.as_deref(), timing.as_deref(), opt)
        }
        Commands::Locate { reference, pattern, scheme, max_mismatches } => {
            run_locate(&reference, &pattern, scheme, max_mismatches)
        }
    }
}

fn run_index(reference: &str, output: &str, scheme: Scheme, occ_block: usize) -> Result<()> {
    let seq = io::fasta::read_reference(reference)?;
    info!(reference, len = seq.len(), scheme = scheme.name(), "building index");

    let t = Instant::now();
    let idx = AnyIndex::build(scheme, &seq, occ_block)
        .with_context(|| format!("cannot index reference '{}'", reference))?;
    info!(build_ms = t.elapsed().as_millis() as u64, "index built");

    let out_path = format!("{}.fm", output);
    idx.save_to_file(&out_path)
        .with_context(|| format!("cannot write index to '{}'", out_path))?;
    info!(path = %out_path, "FM index saved");
    Ok(())
}

fn run_assemble(
    reads_path: &str,
    reference: Option<&str>,
    index_path: Option<&str>,
    out_path: Option<&str>,
    timing_path: Option<&str>,
    opt: AssembleOpt,
) -> Result<()> {
    let reads = io::reads::read_reads(reads_path)?;
    if reads.is_empty() {
        warn!(reads = reads_path, "reads file is empty; consensus will be all no-calls");
    }

    let assembly = match (index_path, reference) {
        (Some(p), _) => {
            let t = Instant::now();
            let idx = AnyIndex::load_from_file(p).with_context(|| format!("cannot load index '{}'", p))?;
            let load_ms = t.elapsed().as_millis() as u64;
            info!(index = p, scheme = idx.scheme().name(), load_ms, "index loaded");
            let mut asm = assemble::assemble_with(&idx, &reads, opt.max_mismatches, opt.threads)?;
            asm.timings.build_ms = load_ms;
            asm
        }
        (None, Some(r)) => {
            let seq = io::fasta::read_reference(r)?;
            assemble::assemble(&seq, &reads, &opt)?
        }
        (None, None) => anyhow::bail!("either --reference or --index is required"),
    };

    io::reads::write_consensus(out_path, &assembly.consensus)?;
    let t = assembly.timings;
    info!(
        build_ms = t.build_ms,
        map_ms = t.map_ms,
        assemble_ms = t.assemble_ms,
        total_ms = t.total_ms(),
        mapped = assembly.mapped_reads,
        reads = reads.len(),
        "assembly finished"
    );
    if let Some(p) = timing_path {
        std::fs::write(p, t.report()).with_context(|| format!("cannot write timing report '{}'", p))?;
    }
    Ok(())
}

fn run_locate(reference: &str, pattern: &str, scheme: Scheme, max_mismatches: usize) -> Result<()> {
    let seq = io::fasta::read_reference(reference)?;
    let idx = AnyIndex::build(scheme, &seq, 64)
        .with_context(|| format!("cannot index reference '{}'", reference))?;
    let pat = fm_assemble::util::dna::normalize_seq(pattern.as_bytes());
    let hits = idx.locate(&pat, max_mismatches).context("cannot encode pattern")?;
    info!(hits = hits.len(), "pattern located");
    for p in hits {
        println!("{}", p);
    }
    Ok(())
}
