//! docuchat CLI entry point.
//!
//! Binary name: `docuchat`
//!
//! Parses CLI arguments, resolves configuration (flag > env > config file
//! > default), builds the API client, then dispatches to the appropriate
//! command handler.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use docuchat_client::ApiClient;
use docuchat_client::config::{default_config_path, load_config, resolve_base_url};
use docuchat_types::config::ClientConfig;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,docuchat=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let mut config = match default_config_path() {
        Some(path) => load_config(&path).await,
        None => ClientConfig::default(),
    };
    resolve_base_url(&mut config, cli.api_url.clone());

    let api = ApiClient::new(&config)?;

    match cli.command {
        Commands::Chat { session } => {
            cli::chat::run_chat(api, session.as_deref(), cli.verbose > 0).await?;
        }
        Commands::Ask { question, session } => {
            cli::ask::ask_once(&api, &question, session.as_deref()).await?;
        }
        Commands::Sessions => {
            cli::session::list_sessions(&api, cli.json).await?;
        }
        Commands::New { title } => {
            cli::session::new_session(&api, title.as_deref(), cli.json).await?;
        }
        Commands::Rename { id, title } => {
            cli::session::rename_session(&api, &id, &title).await?;
        }
        Commands::Delete { id, force } => {
            cli::session::delete_session(&api, &id, force).await?;
        }
        Commands::Docs => {
            cli::document::list_documents(&api, cli.json).await?;
        }
        Commands::Export { id, output } => {
            cli::export::export_session(&api, &id, &output).await?;
        }
    }

    Ok(())
}
