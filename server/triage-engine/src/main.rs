//! Binary entrypoint: read a log excerpt, write one AnalysisResult JSON object.
//!
//! Input is stdin unless `--file` is given. On failure a structured
//! ErrorOutput is written to stdout and the process exits non-zero.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use triage_engine::types::ErrorOutput;
use triage_engine::{Analyzer, Config, DisabledProvider, EngineError, InsightProvider, StaticProvider};

#[derive(Debug, Parser)]
#[command(name = "triage-engine", about = "Rule-based log triage (JSON out)")]
struct Args {
  /// Read the log from this file instead of stdin.
  #[arg(long)]
  file: Option<PathBuf>,

  /// Enrich with a canned insight instead of calling no provider.
  #[arg(long)]
  mock_ai: bool,

  /// Pretty-print the JSON output.
  #[arg(long)]
  pretty: bool,
}

fn main() {
  let args = Args::parse();
  if let Err(e) = run(&args) {
    let mut out = io::stdout().lock();
    let _ = serde_json::to_writer(&mut out, &ErrorOutput::new(e.to_string()));
    let _ = writeln!(out);
    let _ = writeln!(io::stderr(), "triage-engine error: {}", e);
    std::process::exit(1);
  }
}

fn run(args: &Args) -> Result<(), EngineError> {
  let raw = match &args.file {
    Some(path) => String::from_utf8_lossy(&std::fs::read(path)?).into_owned(),
    None => {
      let mut buf = Vec::new();
      io::stdin().lock().read_to_end(&mut buf)?;
      String::from_utf8_lossy(&buf).into_owned()
    }
  };

  let provider: Arc<dyn InsightProvider> = if args.mock_ai {
    Arc::new(StaticProvider::sample())
  } else {
    Arc::new(DisabledProvider)
  };
  let analyzer = Analyzer::new(Config::from_env()?, provider);
  let result = analyzer.analyze(&raw);

  let mut out = io::stdout().lock();
  if args.pretty {
    serde_json::to_writer_pretty(&mut out, &result)?;
  } else {
    serde_json::to_writer(&mut out, &result)?;
  }
  writeln!(out)?;
  Ok(())
}
