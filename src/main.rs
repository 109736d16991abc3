//! mpt CLI - Command line interface for merkle_patricia
//!
//! Computes trie roots from key/value pairs and runs `TrieTests` fixtures.
//! Results go to stdout as JSON; logs go to stderr.

use clap::{Parser, Subcommand};
use merkle_patricia::fixture::{load_fixtures, run_fixtures, string_to_bytes};
use merkle_patricia::{MerklePatriciaTrie, TrieConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "mpt")]
#[command(about = "Ethereum-compatible Merkle Patricia Trie roots")]
#[command(version)]
struct Cli {
    /// Output format (json or text)
    #[arg(short, long, default_value = "json", global = true)]
    format: OutputFormat,

    /// Hash keys with Keccak-256 before inserting them
    #[arg(short, long, global = true)]
    secured: bool,

    /// Value treated as absent (0x-prefixed hex, otherwise UTF-8)
    #[arg(long, global = true)]
    default: Option<String>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply KEY VALUE pairs in order and print the root
    Root {
        /// Alternating keys and values (0x-prefixed hex, otherwise UTF-8)
        pairs: Vec<String>,
    },

    /// Run a TrieTests JSON fixture file and compare roots
    Fixture {
        /// Path to the fixture file
        path: PathBuf,
        /// Only run the test with this name
        #[arg(short, long)]
        test: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;

    match cli.command {
        Commands::Root { pairs } => {
            if pairs.len() % 2 != 0 {
                anyhow::bail!("Expected KEY VALUE pairs, got an odd number of arguments");
            }

            let mut trie = MerklePatriciaTrie::new(config.clone());
            for pair in pairs.chunks(2) {
                let key = string_to_bytes(&pair[0])?;
                let value = string_to_bytes(&pair[1])?;
                trie.set(&key, value);
            }

            output(
                &cli.format,
                &serde_json::json!({
                    "root": trie.root(),
                    "entries": trie.len(),
                    "secured": config.secured,
                }),
            )?;
        }

        Commands::Fixture { path, test } => {
            let mut tests = load_fixtures(&path)?;
            if let Some(name) = &test {
                tests.retain(|t| &t.name == name);
                if tests.is_empty() {
                    output(
                        &cli.format,
                        &serde_json::json!({
                            "status": "error",
                            "message": format!("Test not found: {}", name)
                        }),
                    )?;
                    std::process::exit(1);
                }
            }

            let outcomes = run_fixtures(&tests, &config);
            let failed = outcomes.iter().filter(|o| !o.passed()).count();

            output(
                &cli.format,
                &serde_json::json!({
                    "status": if failed == 0 { "ok" } else { "failed" },
                    "passed": outcomes.len() - failed,
                    "failed": failed,
                    "results": outcomes.iter().map(|o| serde_json::json!({
                        "name": o.name,
                        "passed": o.passed(),
                        "expected": o.expected,
                        "actual": o.actual,
                    })).collect::<Vec<_>>(),
                }),
            )?;

            if failed > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "merkle_patricia=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_config(cli: &Cli) -> anyhow::Result<TrieConfig> {
    let mut config = TrieConfig::new().with_secured(cli.secured);
    if let Some(default) = &cli.default {
        config = config.with_default(string_to_bytes(default)?);
    }
    Ok(config)
}

fn output(format: &OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(value)?);
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}
