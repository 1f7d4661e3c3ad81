//! CLI entry point - the composition root.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use restream_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

/// Initialize logging on stderr so stdout stays clean for rendered output.
///
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = bootstrap(&CliConfig::from_cli(&cli))?;

    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command()
            .print_help()
            .map_err(|e| CliError::Output(e.to_string()))?;
        return Ok(());
    };

    match command {
        Commands::Replay { file, seed, json } => {
            handlers::replay::execute(&ctx, &seed, file.as_deref(), json).await
        }
        Commands::Follow { seed } => handlers::follow::execute(&ctx, &seed).await,
    }
}

fn main() -> anyhow::Result<()> {
    // Load .env before parsing so env-backed flags pick it up
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(cli));
    // A stdin read may still be parked on a blocking thread after Ctrl-C;
    // do not wait for it.
    runtime.shutdown_background();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
    Ok(())
}
