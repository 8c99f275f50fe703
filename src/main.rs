use clap::Parser;
use tracing_subscriber::EnvFilter;

use option_bets::cli::Cli;
use option_bets::config::RunConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = RunConfig::from_cli(&cli)?;
    let path = option_bets::run(&config)?;
    println!("{}", path.display());
    Ok(())
}
