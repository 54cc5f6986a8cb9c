//! Diagnostic CLI for the matcher core (SPEC_FULL ambient §C).
//!
//! Loads a newline-delimited pattern file, builds a matcher, scans a file
//! or stdin line-by-line, and prints matched ids plus search statistics.
//! This is operational tooling for exercising the core directly, not the
//! detection engine the core is embedded in (that orchestration — config,
//! worker threads, packet acquisition — is explicitly out of scope, §1).

use anyhow::{bail, Context, Result};
use clap::Parser;
use pfac_mpm::{MatchSink, Mpm, PatternFlags, ThreadContext};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

/// Scan input against a set of patterns using the failureless
/// Aho-Corasick core.
#[derive(Parser)]
#[command(name = "pfac-mpm")]
#[command(about = "Scan input against a pattern set using a failureless Aho-Corasick matcher")]
#[command(version)]
struct Cli {
    /// Pattern file: one pattern per line, `id<TAB>flags<TAB>pattern`.
    /// `flags` is `s` (case-sensitive) or `i` (case-insensitive).
    #[arg(value_name = "PATTERNS")]
    patterns: PathBuf,

    /// Input file to scan, or "-" for stdin. Each line is scanned as one
    /// independent buffer.
    #[arg(value_name = "INPUT", default_value = "-")]
    input: PathBuf,

    /// Force the 32-bit delta variant regardless of automaton size.
    #[arg(long)]
    force_32bit: bool,

    /// Print matcher construction stats before scanning.
    #[arg(long)]
    info: bool,

    /// Print per-run search stats after scanning.
    #[arg(long)]
    stats: bool,
}

fn load_patterns(path: &PathBuf, mpm: &mut Mpm) -> Result<u32> {
    let file = File::open(path).with_context(|| format!("opening pattern file {}", path.display()))?;
    let mut count = 0u32;

    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("reading {} line {}", path.display(), lineno + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.splitn(3, '\t');
        let id: u32 = fields
            .next()
            .with_context(|| format!("{}:{}: missing id field", path.display(), lineno + 1))?
            .parse()
            .with_context(|| format!("{}:{}: invalid id", path.display(), lineno + 1))?;
        let flag = fields
            .next()
            .with_context(|| format!("{}:{}: missing flags field", path.display(), lineno + 1))?;
        let pattern = fields
            .next()
            .with_context(|| format!("{}:{}: missing pattern field", path.display(), lineno + 1))?;

        match flag {
            "s" => mpm.add_pattern_case_sensitive(pattern.as_bytes(), id, PatternFlags::default())?,
            "i" => mpm.add_pattern_case_insensitive(pattern.as_bytes(), id, PatternFlags::default())?,
            other => bail!("{}:{}: unknown flags {:?} (want \"s\" or \"i\")", path.display(), lineno + 1, other),
        }
        count += 1;
    }

    Ok(count)
}

fn scan_reader<R: BufRead>(mpm: &Mpm, reader: R, print_stats: bool) -> Result<()> {
    let mut thread_ctx = ThreadContext::new();
    let mut sink = MatchSink::new(mpm.max_id() + 1);

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading input line {}", lineno + 1))?;
        sink.clear();
        let raw = mpm.search(&mut thread_ctx, &mut sink, line.as_bytes());
        if !sink.is_empty() {
            let mut ids = sink.ids().to_vec();
            ids.sort_unstable();
            let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
            println!("{}: raw={} ids=[{}]", lineno + 1, raw, ids.join(","));
        }
    }

    if print_stats {
        thread_ctx.print_search_stats();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut mpm = Mpm::new();
    mpm.set_force_32bit(cli.force_32bit);
    let n = load_patterns(&cli.patterns, &mut mpm)?;
    mpm.prepare().context("preparing matcher")?;

    if cli.info {
        eprintln!("loaded {n} patterns");
        mpm.print_info();
    }

    if cli.input.as_os_str() == "-" {
        scan_reader(&mpm, io::stdin().lock(), cli.stats)?;
    } else {
        let file = File::open(&cli.input).with_context(|| format!("opening input {}", cli.input.display()))?;
        scan_reader(&mpm, BufReader::new(file), cli.stats)?;
    }

    Ok(())
}
