//! CLI entry point - the composition root.
//!
//! Parses arguments, installs logging, bootstraps the gateway and routes the
//! subcommand to its handler.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use toolhub_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(CliConfig::new(cli.config)).await?;

    match command {
        Commands::Servers => handlers::servers::execute(&ctx).await?,
        Commands::Status { id } => handlers::servers::execute_status(&ctx, &id).await?,
        Commands::Tools => handlers::tools::execute(&ctx).await?,
        Commands::Call { tool, args } => {
            handlers::call::execute(&ctx, &tool, args.as_deref()).await?;
        }
        Commands::Request { envelope } => handlers::request::execute(&ctx, &envelope).await?,
        Commands::Stats => handlers::stats::execute(&ctx).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}
