//! FORGOR companion
//!
//! Entry point for the host loop and the account/content CLI.

mod cli;
mod cmd_account;
mod cmd_content;
mod cmd_run;
mod context;
mod host;
mod logging;
mod sink;

use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::context::{load_config, validate};
use crate::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config)?;
    init_tracing(&config.logging)?;
    debug!("Loaded configuration for {}", config.server.base_url);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            validate(&config)?;
            cmd_run::run(config).await
        }
        Commands::Login { username, password } => {
            cmd_account::login(&config, &username, &password).await
        }
        Commands::Register { username, password } => {
            cmd_account::register(&config, &username, &password).await
        }
        Commands::Logout => cmd_account::logout(&config).await,
        Commands::Tier => cmd_account::tier(&config).await,
        Commands::Query { text } => cmd_content::query(&config, &text).await,
        Commands::Upload {
            source,
            page_url,
            page_title,
        } => cmd_content::upload(&config, &source, &page_url, &page_title).await,
        Commands::Similar {
            image,
            page_url,
            page_title,
        } => cmd_content::similar(&config, &image, &page_url, &page_title).await,
        Commands::Delete { file_name } => cmd_content::delete(&config, &file_name).await,
        Commands::Fetch {
            name,
            output,
            thumbnail,
        } => cmd_content::fetch(&config, &name, &output, thumbnail).await,
        Commands::CheckConfig => {
            validate(&config)?;
            println!("Configuration OK");
            Ok(())
        }
    }
}
