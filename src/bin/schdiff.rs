//! schdiff - compare two schematic exports

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schematic_diff::{
    ingest, DiffReport, ExportFormat, IndexOptions, IngestOptions, PartNumberClassifier, Snapshot,
    TextSummary, NO_CONNECT,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Auto,
    Orcad,
    Kicad,
}

/// Compare two revisions of a schematic and report net and component changes.
#[derive(Parser)]
#[command(name = "schdiff")]
#[command(author, version)]
struct Cli {
    /// Base design (old revision)
    old: PathBuf,

    /// Target design (new revision)
    new: PathBuf,

    /// Input format of both files
    #[arg(short, long, value_enum, default_value = "auto")]
    format: Format,

    /// Reject exports that repeat a reference designator
    #[arg(long)]
    strict: bool,

    /// Extra net name treated as no-connect, on top of NC (repeatable)
    #[arg(long = "no-connect")]
    no_connect: Vec<String>,

    /// Only keep nets and references containing this text, in either output
    #[arg(long)]
    filter: Option<String>,

    /// Print a Markdown summary instead of JSON
    #[arg(long)]
    summary: bool,

    /// Entries per list in the summary
    #[arg(long, default_value = "10")]
    top: usize,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Errors only
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn load(path: &Path, format: Format, options: &IngestOptions) -> Result<Snapshot> {
    let input =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let format = match format {
        Format::Orcad => ExportFormat::OrcadJson,
        Format::Kicad => ExportFormat::KicadNetlist,
        Format::Auto => match ExportFormat::detect(Some(path), &input) {
            Some(format) => format,
            None => bail!("cannot tell the format of {}, pass --format", path.display()),
        },
    };
    ingest::load(&input, format, options, &PartNumberClassifier)
        .with_context(|| format!("parsing {}", path.display()))
}

fn no_connect_markers(extra: &[String]) -> Vec<String> {
    let mut markers = vec![NO_CONNECT.to_owned()];
    for marker in extra {
        if !markers.contains(marker) {
            markers.push(marker.clone());
        }
    }
    markers
}

fn render(report: &DiffReport, cli: &Cli) -> Result<String> {
    let filtered;
    let report = match cli.filter.as_deref() {
        Some(text) => {
            filtered = report.filtered(text);
            &filtered
        }
        None => report,
    };

    if cli.summary {
        Ok(TextSummary::new(report, cli.top).to_string())
    } else {
        Ok(serde_json::to_string_pretty(report)? + "\n")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let markers = no_connect_markers(&cli.no_connect);
    let options = IngestOptions {
        strict_references: cli.strict,
        no_connect_markers: markers.clone(),
        ..Default::default()
    };
    let old = load(&cli.old, cli.format, &options)?;
    let new = load(&cli.new, cli.format, &options)?;

    let index_options = IndexOptions {
        no_connect_markers: markers,
    };
    let report = DiffReport::compare_with(&old.parts, &new.parts, &index_options);

    print!("{}", render(&report, &cli)?);
    Ok(())
}
