//! `seiche` — StationXML inspection and combination tool.
//!
//! # Usage
//!
//! ```
//! seiche info inventory.xml --json
//! seiche merge a.xml b.xml c.xml -o combined.xml --report conflicts.json
//! seiche append a.xml b.xml -o both.xml
//! ```

use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use seiche_core::{
  diag::Diagnostic,
  merge,
  value::{Document, Value},
};
use seiche_stationxml::{ReadOptions, WriteOptions};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "seiche", about = "StationXML inspection and combination")]
struct Cli {
  #[command(subcommand)]
  command: Command,

  /// Report unknown attributes and elements found while decoding.
  #[arg(long, global = true)]
  strict: bool,
}

#[derive(Subcommand)]
enum Command {
  /// Print a summary of a StationXML document.
  Info {
    file: PathBuf,

    /// Emit the summary as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Merge documents, deduplicating by code and epoch overlap.
  ///
  /// The first file supplies the output's header fields; later files are
  /// folded in left to right.
  Merge {
    #[arg(required = true, num_args = 2..)]
    files: Vec<PathBuf>,

    #[arg(short, long)]
    output: PathBuf,

    /// Write all decode/merge/encode diagnostics to a JSON report.
    #[arg(long)]
    report: Option<PathBuf>,
  },

  /// Concatenate two documents without any deduplication.
  Append {
    left:  PathBuf,
    right: PathBuf,

    #[arg(short, long)]
    output: PathBuf,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let read_opts = ReadOptions {
    warn_unknown: cli.strict,
  };

  match cli.command {
    Command::Info { file, json } => info(&file, json, &read_opts),
    Command::Merge {
      files,
      output,
      report,
    } => run_merge(&files, &output, report.as_deref(), &read_opts),
    Command::Append {
      left,
      right,
      output,
    } => run_append(&left, &right, &output, &read_opts),
  }
}

/// Decode one file, logging its diagnostics.
fn load(
  path: &Path,
  opts: &ReadOptions,
  diags: &mut Vec<Diagnostic>,
) -> anyhow::Result<Document> {
  let bytes = fs::read(path)
    .with_context(|| format!("reading {}", path.display()))?;
  let decoded = seiche_stationxml::read_document_with(&bytes, opts)
    .with_context(|| format!("decoding {}", path.display()))?;
  for d in &decoded.diagnostics {
    tracing::warn!("{}: {d}", path.display());
  }
  diags.extend(decoded.diagnostics);
  Ok(decoded.document)
}

fn write_output(path: &Path, xml: &[u8]) -> anyhow::Result<()> {
  fs::write(path, xml)
    .with_context(|| format!("writing {}", path.display()))?;
  tracing::info!("wrote {}", path.display());
  Ok(())
}

// ─── info ─────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Summary {
  source:   Option<String>,
  sender:   Option<String>,
  networks: Vec<NetworkSummary>,
}

#[derive(Serialize)]
struct NetworkSummary {
  code:     String,
  stations: Vec<StationSummary>,
}

#[derive(Serialize)]
struct StationSummary {
  code:     String,
  channels: Vec<String>,
}

fn summarize(doc: &Document) -> Summary {
  let networks = doc
    .networks()
    .map(|net| NetworkSummary {
      code:     net.code().unwrap_or("").to_string(),
      stations: net
        .children()
        .iter()
        .filter_map(Value::as_record)
        .map(|sta| StationSummary {
          code:     sta.code().unwrap_or("").to_string(),
          channels: sta
            .children()
            .iter()
            .filter_map(Value::as_record)
            .map(|ch| {
              format!(
                "{}.{}",
                ch.str_field("locationCode").unwrap_or(""),
                ch.code().unwrap_or("")
              )
            })
            .collect(),
        })
        .collect(),
    })
    .collect();

  Summary {
    source: doc.source().map(str::to_string),
    sender: doc.root.str_field("Sender").map(str::to_string),
    networks,
  }
}

fn info(file: &Path, json: bool, opts: &ReadOptions) -> anyhow::Result<()> {
  let mut diags = Vec::new();
  let doc = load(file, opts, &mut diags)?;
  let summary = summarize(&doc);

  if json {
    println!("{}", serde_json::to_string_pretty(&summary)?);
    return Ok(());
  }

  println!("Source: {}", summary.source.as_deref().unwrap_or("(none)"));
  if let Some(sender) = &summary.sender {
    println!("Sender: {sender}");
  }
  for net in &summary.networks {
    println!("Network {} ({} stations)", net.code, net.stations.len());
    for sta in &net.stations {
      println!("  Station {}: {}", sta.code, sta.channels.join(", "));
    }
  }
  Ok(())
}

// ─── merge / append ───────────────────────────────────────────────────────────

fn run_merge(
  files: &[PathBuf],
  output: &Path,
  report: Option<&Path>,
  opts: &ReadOptions,
) -> anyhow::Result<()> {
  let mut diags = Vec::new();
  let mut docs = Vec::with_capacity(files.len());
  for path in files {
    docs.push(load(path, opts, &mut diags)?);
  }

  let (combined, merge_diags) =
    merge::merge_many(docs, true).context("no input documents")?;
  for d in &merge_diags {
    tracing::warn!("{d}");
  }
  diags.extend(merge_diags);

  let encoded = seiche_stationxml::write_document_with(
    &combined,
    &WriteOptions { verbose: true },
  )?;
  for d in &encoded.diagnostics {
    tracing::warn!("{d}");
  }
  diags.extend(encoded.diagnostics);

  if let Some(report_path) = report {
    let json = serde_json::to_vec_pretty(&diags)?;
    fs::write(report_path, json)
      .with_context(|| format!("writing {}", report_path.display()))?;
    tracing::info!(
      "wrote {} diagnostic(s) to {}",
      diags.len(),
      report_path.display()
    );
  }

  write_output(output, &encoded.xml)
}

fn run_append(
  left: &Path,
  right: &Path,
  output: &Path,
  opts: &ReadOptions,
) -> anyhow::Result<()> {
  let mut diags = Vec::new();
  let mut into = load(left, opts, &mut diags)?;
  let from = load(right, opts, &mut diags)?;
  merge::append(&mut into, from);

  let xml = seiche_stationxml::write_document(&into)?;
  write_output(output, &xml)
}
