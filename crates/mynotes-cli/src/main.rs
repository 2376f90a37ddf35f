//! mynotes CLI - keep per-user text notes from the command line
//!
//! Every invocation acts as one signed-in user and works against a local
//! SQLite store.

mod cli;
mod commands;
mod config;
mod error;

use clap::{CommandFactory, Parser};
use mynotes_core::NotesService;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::{run_login, run_logout, run_verify, run_whoami};
use crate::commands::common::Context;
use crate::commands::completions::run_completions;
use crate::commands::delete::{run_clear, run_delete, run_delete_user};
use crate::commands::edit::run_edit;
use crate::commands::export::run_export;
use crate::commands::list::run_list;
use crate::commands::show::run_show;
use crate::config::{default_config_path, CliConfig};
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
    init_tracing();

    let cli = Cli::parse();

    if let Some(Commands::Completions { shell, output }) = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let config_path = default_config_path().map_err(CliError::Config)?;
    let config = CliConfig::load_from_path(&config_path).map_err(CliError::Config)?;
    tracing::debug!("Loaded CLI config from {}", config_path.display());
    let service = NotesService::new(config.store_config(cli.data_dir.as_deref()));
    let ctx = Context {
        service,
        config,
        config_path,
        email: cli.email,
    };

    let result = dispatch(cli.command, cli.note, &ctx).await;
    if ctx.service.is_open().await {
        ctx.service.close().await?;
    }
    result
}

async fn dispatch(
    command: Option<Commands>,
    quick_note: Vec<String>,
    ctx: &Context,
) -> Result<(), CliError> {
    match command {
        Some(Commands::Login { email }) => run_login(&email, ctx).await,
        Some(Commands::Logout) => run_logout(ctx).await,
        Some(Commands::Whoami) => run_whoami(ctx).await,
        Some(Commands::Verify) => run_verify(ctx).await,
        Some(Commands::Add { content }) => run_add(&content, ctx).await,
        Some(Commands::List { all, json }) => run_list(all, json, ctx).await,
        Some(Commands::Show { id }) => run_show(id, ctx).await,
        Some(Commands::Edit { id, content }) => run_edit(id, &content, ctx).await,
        Some(Commands::Delete { id }) => run_delete(id, ctx).await,
        Some(Commands::Clear { yes }) => run_clear(yes, ctx).await,
        Some(Commands::DeleteUser { email }) => run_delete_user(&email, ctx).await,
        Some(Commands::Export { format, output }) => {
            run_export(format, output.as_deref(), ctx).await
        }
        Some(Commands::Completions { shell, output }) => run_completions(shell, output.as_deref()),
        None => {
            // Quick capture mode: mynotes "my thought"
            if quick_note.is_empty() {
                Cli::command().print_help()?;
                println!();
                Ok(())
            } else {
                run_add(&quick_note, ctx).await
            }
        }
    }
}

fn init_tracing() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "mynotes=info".parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
