use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pip_index::cli::{commands, Cli, Commands, LogLevel};

fn initialize_tracing(log_level: &LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Logs to stderr; index output owns stdout
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level);

    match cli.command {
        Commands::Update {
            package,
            version,
            commit,
            index_repo,
            github_user,
            github_repo,
        } => {
            commands::update_command(package, version, commit, index_repo, github_user, github_repo)
                .await?
        }
        Commands::Regen {
            root,
            index_repo,
            github_user,
        } => commands::regen_command(root, index_repo, github_user).await?,
    }

    Ok(())
}
