//! Set-associative cache simulator CLI.
//!
//! This binary replays a memory trace through a single cache. It performs:
//! 1. **Configuration:** Built-in defaults, optionally a JSON config file, then flag overrides.
//! 2. **Replay:** Reads the trace from a file or stdin and applies each record in order.
//! 3. **Reporting:** Prints the parameters and results, as text or JSON, and optionally every block.
//!
//! Example: `xz -dc art.trace.xz | cachesim -s 64 -a 2 -l 32 --mp 30`

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::{fs, process};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use cachesim_core::cache::SetAssociativeCache;
use cachesim_core::common::TraceError;
use cachesim_core::config::{CacheConfig, WritebackPolicy};
use cachesim_core::sim::{Simulator, TraceReader, trace};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    version,
    about = "Trace-driven set-associative cache simulator",
    long_about = "Replays a memory trace through a set-associative LRU write-back cache and reports hit/miss statistics and an estimated cycle count.\n\nEach trace line is `<marker> <0=load|1=store> <hex address> <instruction count>`. The trace is read from TRACE, or from stdin when omitted.\n\nThe single-dash `-mp 30` form is accepted as a spelling of `--mp 30`.\n\nExamples:\n  cachesim -a 2 -l 32 -s 64 --mp 30 traces/art.trace\n  gunzip -c gcc.trace.gz | cachesim -s 16 -a 1 -l 16"
)]
struct Cli {
    /// Trace file to replay (stdin if omitted).
    trace: Option<PathBuf>,

    /// Associativity (ways per set).
    #[arg(short = 'a', long = "assoc")]
    associativity: Option<u64>,

    /// Block size in bytes.
    #[arg(short = 'l', long = "block-size")]
    block_size: Option<u64>,

    /// Cache size in KB.
    #[arg(short = 's', long = "size")]
    size_kb: Option<u64>,

    /// Miss penalty in cycles.
    #[arg(long = "mp", alias = "miss-penalty")]
    miss_penalty: Option<u64>,

    /// When to charge the write-back cost.
    #[arg(long, value_enum)]
    writeback_policy: Option<WritebackArg>,

    /// JSON cache configuration; flags override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit the results as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Print every block of the final cache state.
    #[arg(long)]
    dump_blocks: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WritebackArg {
    DirtyEviction,
    EveryMiss,
}

impl From<WritebackArg> for WritebackPolicy {
    fn from(value: WritebackArg) -> Self {
        match value {
            WritebackArg::DirtyEviction => Self::DirtyEviction,
            WritebackArg::EveryMiss => Self::EveryMiss,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    let config = build_config(&cli);

    if !cli.json {
        println!("{config}");
    }

    let mut sim = Simulator::new(&config).unwrap_or_else(|e| {
        eprintln!("Error: invalid cache geometry: {e}");
        process::exit(1);
    });

    let result = match &cli.trace {
        Some(path) => trace::open(path).and_then(|reader| sim.run(reader).map(|_| ())),
        None => sim.run(TraceReader::new(io::stdin().lock())).map(|_| ()),
    };
    if let Err(e) = result {
        report_trace_error(&e, cli.trace.as_ref());
        process::exit(1);
    }

    let cache = sim.into_cache();
    if let Err(e) = write_results(&mut io::stdout().lock(), &cache, &cli) {
        eprintln!("Error: could not write results: {e}");
        process::exit(1);
    }
}

/// Writes the block dump when requested, then the results as text or JSON,
/// and flushes `out`.
fn write_results(out: &mut impl Write, cache: &SetAssociativeCache, cli: &Cli) -> io::Result<()> {
    if cli.dump_blocks {
        for (index, set) in cache.sets().enumerate() {
            for block in set {
                writeln!(out, "set {index:>6}  {block}")?;
            }
        }
    }

    if cli.json {
        serde_json::to_writer_pretty(&mut *out, &cache.stats().report())?;
        writeln!(out)?;
    } else {
        write!(out, "{}", cache.stats())?;
    }
    out.flush()
}

/// Rewrites the single-dash `-mp` spelling to `--mp`, which clap would
/// otherwise read as a cluster of short flags. Arguments after `--` are left alone.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut options_done = false;
    args.into_iter()
        .map(|arg| {
            if options_done {
                return arg;
            }
            let rewritten = match arg.to_str() {
                Some("--") => {
                    options_done = true;
                    None
                }
                Some("-mp") => Some(OsString::from("--mp")),
                Some(s) if s.starts_with("-mp=") => Some(OsString::from(format!("-{s}"))),
                _ => None,
            };
            rewritten.unwrap_or(arg)
        })
        .collect()
}

/// Defaults, then the JSON file if given, then individual flags.
fn build_config(cli: &Cli) -> CacheConfig {
    let mut config = cli.config.as_ref().map_or_else(CacheConfig::default, |path| {
        let text = fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading config {}: {e}", path.display());
            process::exit(1);
        });
        CacheConfig::from_json(&text).unwrap_or_else(|e| {
            eprintln!("Error parsing config {}: {e}", path.display());
            process::exit(1);
        })
    });

    if let Some(assoc) = cli.associativity {
        config.associativity = assoc;
    }
    if let Some(block) = cli.block_size {
        config.block_bytes = block;
    }
    if let Some(kb) = cli.size_kb {
        config.size_bytes = kb.saturating_mul(1024);
    }
    if let Some(penalty) = cli.miss_penalty {
        config.miss_penalty = penalty;
    }
    if let Some(policy) = cli.writeback_policy {
        config.writeback = policy.into();
    }
    tracing::debug!(?config, "configuration resolved");
    config
}

fn report_trace_error(error: &TraceError, path: Option<&PathBuf>) {
    let source = path.map_or_else(|| "<stdin>".to_owned(), |p| p.display().to_string());
    eprintln!("Error: {source}: {error}");
}
