//! Qualifier CLI entry point.
//!
//! Binary name: `qualifier`
//!
//! Parses CLI arguments, sets up tracing, loads configuration, then dispatches
//! to the command handler. Any fatal flow error surfaces as a non-zero exit.

mod cli;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use qualifier_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need logging or config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "qualifier", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = dispatch(&cli).await;

    shutdown_tracing();
    result
}

async fn dispatch(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Run { overrides } => {
            let config = cli::load(cli.config.as_deref(), overrides).await?;
            cli::run::run(config, cli.json, cli.quiet).await
        }

        Commands::Select {
            identifier,
            overrides,
        } => {
            let target = cli::select::resolve_identifier(
                cli.config.as_deref(),
                identifier.as_deref(),
                overrides,
            )
            .await?;
            cli::select::select(target, cli.json)
        }

        Commands::Config { overrides } => {
            let config = cli::load(cli.config.as_deref(), overrides).await?;
            cli::config::show(&config, cli.json)
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }
}
