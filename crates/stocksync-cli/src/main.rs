use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod run;

#[derive(Debug, Parser)]
#[command(name = "stocksync")]
#[command(about = "Push supplier stock and prices to Ozon and Yandex Market")]
struct Cli {
    /// Reconcile and batch, but send nothing to the marketplaces
    #[arg(long, global = true)]
    dry_run: bool,

    /// Read the supplier feed from a local .zip/.xls/.xlsx instead of downloading it
    #[arg(long, global = true, value_name = "PATH")]
    feed_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Sync every configured marketplace (default)
    All,
    /// Sync Ozon only
    Ozon,
    /// Sync every configured Yandex Market campaign
    Yandex,
}

impl Commands {
    fn includes_ozon(self) -> bool {
        matches!(self, Commands::All | Commands::Ozon)
    }

    fn includes_yandex(self) -> bool {
        matches!(self, Commands::All | Commands::Yandex)
    }
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match stocksync_core::load_app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.log_level) {
        eprintln!("invalid log filter {:?}: {e}", config.log_level);
        return ExitCode::FAILURE;
    }

    let options = run::RunOptions {
        command: cli.command.unwrap_or(Commands::All),
        dry_run: cli.dry_run,
        feed_file: cli.feed_file,
    };

    match run::run(&config, &options) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            let kind = run::failure_kind(&e);
            tracing::error!(error = %e, %kind, "sync aborted");
            eprintln!("{kind}: {e:#}");
            ExitCode::FAILURE
        }
    }
}
