mod msg;

use airdrop_snapshot::execute;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::msg::{Cli, Command};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (bytes, output) = match cli.command {
        Command::Generate {
            config,
            genesis,
            output,
        } => (execute::generate(&config, &genesis)?, output),
        Command::Raw { genesis, output } => (execute::raw(&genesis)?, output),
        Command::Process {
            config,
            snapshot,
            output,
        } => (execute::process(&config, &snapshot)?, output),
        Command::Genesis {
            config,
            filter,
            genesis,
            output,
        } => (execute::genesis(&config, &filter, &genesis)?, output),
    };

    execute::write_output(output.as_deref(), &bytes)?;
    Ok(())
}
