//! Command-line front end for the rollup verifier.
//!
//! Consumes a JSON-encoded witness (`RollupInput`) and either checks it
//! against a public-input digest or prints the canonical digest for it.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crypto::FieldElement;
use rollup::RollupInput;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollup-verify", about = "Rollup state-transition verifier")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a witness file against a public-input digest.
    Verify {
        /// Path to the JSON witness.
        #[arg(long)]
        input: PathBuf,
        /// Expected public-input digest (0x-prefixed hex).
        #[arg(long)]
        public_hash: String,
    },
    /// Print the canonical public-input digest of a witness file.
    PublicHash {
        /// Path to the JSON witness.
        #[arg(long)]
        input: PathBuf,
    },
}

fn load_input(path: &PathBuf) -> Result<RollupInput> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading witness file {}", path.display()))?;
    serde_json::from_str(&raw).context("decoding witness JSON")
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Verify { input, public_hash } => {
            let witness = load_input(&input)?;
            let pub_hash = FieldElement::from_hex(&public_hash)
                .map_err(|e| anyhow::anyhow!("invalid public hash: {e}"))?;

            match rollup::verify(pub_hash, &witness) {
                Ok(()) => {
                    info!("block accepted");
                    println!("accept");
                    Ok(ExitCode::SUCCESS)
                }
                Err(reason) => {
                    debug!(%reason, "block rejected");
                    println!("reject: {reason}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::PublicHash { input } => {
            let witness = load_input(&input)?;
            println!("{}", witness.public.hash().to_hex());
            Ok(ExitCode::SUCCESS)
        }
    }
}
