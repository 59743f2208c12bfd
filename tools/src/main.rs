//! Shape-code table compiler.
//!
//! Reads character-definition files (and optionally a short-code table),
//! derives a full and a brief code for every character, and can bootstrap
//! third-tier short codes for a given character set. Ingestion runs in two
//! passes because decompositions may reference characters defined later in
//! the same or another file.

mod parse;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use libxingma_core::{l3_bootstrap, Error, LookupTable};
use tracing::info;

#[derive(Parser)]
#[command(about = "Compile a character decomposition database into an input-method table")]
struct Args {
    /// Character definition files, processed in order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Short-code table: tier 1/2 codes plus manually set tier 3 codes.
    #[arg(long)]
    short: Option<PathBuf>,

    /// Allocate third-tier short codes for the given character set and
    /// print the allocation scheme.
    #[arg(long, value_name = "FILE")]
    l3boot: Option<PathBuf>,

    /// Write one output file per input file instead of stdout.
    #[arg(short, long)]
    discrete: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();
}

/// Output sink for one input file: stdout (with a `# <input>` header) by
/// default, or `<input stem>.mb` in discrete mode.
fn open_output(input: &Path, discrete: bool) -> Result<Box<dyn Write>> {
    if !discrete {
        println!("# {}", input.display());
        return Ok(Box::new(io::stdout()));
    }
    let name = input.file_name().context("input has no file name")?;
    let name = Path::new(name);
    if name.extension().and_then(|e| e.to_str()) == Some("mb") {
        bail!(
            "input {} has the same extension as its output",
            input.display()
        );
    }
    let out = name.with_extension("mb");
    let file = File::create(&out).with_context(|| format!("create {}", out.display()))?;
    Ok(Box::new(file))
}

/// Pass 2 over one definition file: emit `char<TAB>full<TAB>brief` for
/// every character it defines.
fn emit_table(input: &Path, lookup: &mut LookupTable, discrete: bool) -> Result<()> {
    let file = File::open(input).with_context(|| format!("open {}", input.display()))?;
    let mut out = BufWriter::new(open_output(input, discrete)?);
    let mut count = 0usize;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(ch) = line.chars().next() else {
            continue;
        };
        let full = lookup.full_code(ch)?;
        let brief = lookup.brief_code(ch)?;
        write!(out, "{ch}\t{full}\t")?;
        out.write_all(&brief)?;
        writeln!(out)?;
        count += 1;
    }
    out.flush()?;
    info!("input file {}: {count} characters", input.display());
    Ok(())
}

/// Run the third-tier bootstrap for the characters listed in `path`, then
/// dump the complete short-code table sorted by code.
fn run_l3_bootstrap(path: &Path, lookup: &mut LookupTable, discrete: bool) -> Result<()> {
    let chars = parse::parse_l3_targets(path)?;
    l3_bootstrap(io::stdout().lock(), &chars, lookup)?;

    let mut out = BufWriter::new(open_output(path, discrete)?);
    for (code, text) in lookup.sorted_short_codes() {
        if !code.is_valid() {
            return Err(Error::InvalidCode {
                code: code.to_string(),
                text: text.to_string(),
            }
            .into());
        }
        writeln!(out, "{text}\t{code}")?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut lookup = LookupTable::new();

    if let Some(short) = &args.short {
        parse::parse_short_code_file(short, &mut lookup)?;
    }

    // two passes, because definitions may reference characters that appear
    // later in the inputs
    for input in &args.inputs {
        parse::parse_char_def_file(input, &mut lookup)?;
    }
    for input in &args.inputs {
        emit_table(input, &mut lookup, args.discrete)?;
    }

    if let Some(l3) = &args.l3boot {
        run_l3_bootstrap(l3, &mut lookup, args.discrete)?;
    }

    Ok(())
}
