use clap::Parser;
use noctivault_cli::commands::Commands;
use noctivault_core::constants::LOG_ENV_VAR;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "noctivault")]
#[command(about = "Masked secret references with an encrypted local mock store", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = cli.command.execute()?;
    std::process::exit(code)
}
