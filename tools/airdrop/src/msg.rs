use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "airdrop")]
#[command(about = "Utility tool to create snapshots for an airdrop")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a snapshot from genesis and write the claim records into it
    Generate {
        #[arg(value_name = "AIRDROP_CONFIG")]
        config: PathBuf,
        #[arg(value_name = "INPUT_GENESIS")]
        genesis: PathBuf,
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
    /// Dump the raw per-account snapshot of a genesis file
    Raw {
        #[arg(value_name = "INPUT_GENESIS")]
        genesis: PathBuf,
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
    /// Apply the configured formulas to a raw snapshot
    Process {
        #[arg(value_name = "AIRDROP_CONFIG")]
        config: PathBuf,
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
    /// Write a processed claim table into a genesis file
    Genesis {
        #[arg(value_name = "AIRDROP_CONFIG")]
        config: PathBuf,
        #[arg(value_name = "FILTER")]
        filter: PathBuf,
        #[arg(value_name = "INPUT_GENESIS")]
        genesis: PathBuf,
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
}
