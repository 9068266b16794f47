//! Fit a conversation history to a token budget and print the result as JSON.
//!
//! Reads one `{"content": ..., "context": ...}` object per line from a file
//! or stdin. Logs go to stderr; set `RUST_LOG` or pass `--verbose`.
//!
//! # Examples
//!
//! ```sh
//! # Optimized history for an 8k budget
//! ctxfit --max-tokens 8000 --input thread.jsonl
//!
//! # Analytics instead of the optimized messages
//! cat thread.jsonl | ctxfit --max-tokens 32000 --analytics --pretty
//!
//! # Keep a larger recent zone and compress toward 60% of the budget
//! ctxfit --max-tokens 8000 --recent-zone 8 --target-fraction 0.6 --input thread.jsonl
//! ```

use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use ctxfit::config::{DEFAULT_RECENT_ZONE_SIZE, DEFAULT_TARGET_FRACTION};
use ctxfit::input::{read_messages, read_messages_from_path};
use ctxfit::{Engine, EngineConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Fit a conversation history to a token budget.
#[derive(Parser)]
#[command(name = "ctxfit")]
struct Cli {
    /// Token budget of the downstream model request
    #[arg(long)]
    max_tokens: usize,

    /// JSON Lines history; stdin when absent or `-`
    #[arg(long)]
    input: Option<PathBuf>,

    /// Print analytics instead of the optimized history
    #[arg(long)]
    analytics: bool,

    /// Messages always kept verbatim at the end of the history
    #[arg(long, default_value_t = DEFAULT_RECENT_ZONE_SIZE)]
    recent_zone: usize,

    /// Fraction of the budget that triggers and bounds compression
    #[arg(long, default_value_t = DEFAULT_TARGET_FRACTION)]
    target_fraction: f64,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::new(cli.max_tokens)
        .with_recent_zone_size(cli.recent_zone)
        .with_target_fraction(cli.target_fraction);
    let mut engine = Engine::with_config(config)?;

    let pairs = match cli.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => read_messages_from_path(path)?,
        _ => read_messages(io::stdin().lock())?,
    };
    engine.add_messages(pairs);
    info!("{}", engine.usage().to_log_string());

    if cli.analytics {
        print_json(&engine.get_analytics(), cli.pretty)
    } else {
        print_json(&engine.optimize_context(), cli.pretty)
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
