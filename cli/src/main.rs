mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{elasticity, project, solve};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins when set; otherwise `-v` raises the default level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Project(args) => project::run(&cli, args),
        Commands::Solve(args) => solve::run(&cli, args),
        Commands::Elasticity(args) => elasticity::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
