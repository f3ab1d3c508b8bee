//! Todo CLI - manage a todo list with reminders from the terminal
//!
//! Talks to the hosted document store; reminders fire while `todo watch` runs.

mod auth;
mod cli;
mod commands;
mod error;

use clap::Parser;
use todo_core::services::SettingsService;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::open_workspace;
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::list::run_list;
use crate::commands::theme::run_theme;
use crate::commands::toggle::run_toggle;
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "todo=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::List { json } => {
            let workspace = open_workspace(config_path).await?;
            run_list(&workspace.manager, &workspace.session, json).await?;
        }
        Commands::Add { text, remind_at } => {
            let workspace = open_workspace(config_path).await?;
            run_add(&workspace.manager, &text, remind_at.as_deref()).await?;
        }
        Commands::Toggle { id } => {
            let workspace = open_workspace(config_path).await?;
            run_toggle(&workspace.manager, &id).await?;
        }
        Commands::Edit {
            id,
            text,
            remind_at,
            clear_reminder,
        } => {
            let workspace = open_workspace(config_path).await?;
            run_edit(
                &workspace.manager,
                &id,
                &text,
                remind_at.as_deref(),
                clear_reminder,
            )
            .await?;
        }
        Commands::Delete { id } => {
            let workspace = open_workspace(config_path).await?;
            run_delete(&workspace.manager, &id).await?;
        }
        Commands::Watch => {
            let workspace = open_workspace(config_path).await?;
            run_watch(&workspace.manager, &workspace.config).await?;
        }
        Commands::Auth { command } => run_auth(command, config_path).await?,
        Commands::Theme { command } => {
            run_theme(command, &SettingsService::open_default()?)?;
        }
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
