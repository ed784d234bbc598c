//! Todolist CLI - your todo list in the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{account, lang, todo};

/// Todolist - a todo list in your terminal
#[derive(Parser)]
#[command(name = "todo", version, about, long_about = None)]
struct Cli {
    /// Log backend operations to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        username: String,
        /// Password (prompted for when omitted)
        #[arg(long, short, env = "TODOLIST_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign in and start a session
    Login {
        username: String,
        /// Password (prompted for when omitted)
        #[arg(long, short, env = "TODOLIST_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// End the current session
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List your todos, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a todo
    Add {
        /// Task text
        #[arg(required = true, num_args = 1..)]
        task: Vec<String>,
    },

    /// Mark a todo as done
    Done {
        /// Todo ID
        id: String,
        /// Mark as not done instead
        #[arg(long)]
        undo: bool,
    },

    /// Delete a todo
    Remove {
        /// Todo ID
        id: String,
    },

    /// Change the message language (zh-CN, en-US)
    Lang {
        /// Locale to switch to; toggles when omitted
        locale: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose || std::env::var_os("RUST_LOG").is_some() {
        // Logging must never block the command itself
        let _ = todolist_core::services::logging::init(cli.verbose);
    }

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Register { username, password } => account::register(&username, password).await,
        Commands::Login { username, password } => account::login(&username, password).await,
        Commands::Logout => account::logout().await,
        Commands::Whoami { json } => account::whoami(json),
        Commands::List { json } => todo::list(json).await,
        Commands::Add { task } => todo::add(&task.join(" ")).await,
        Commands::Done { id, undo } => todo::done(&id, !undo).await,
        Commands::Remove { id } => todo::remove(&id).await,
        Commands::Lang { locale } => lang::run(locale.as_deref()),
    }
}
