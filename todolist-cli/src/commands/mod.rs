//! CLI command implementations

pub mod account;
pub mod lang;
pub mod todo;

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use todolist_core::adapters::files::write_atomic;
use todolist_core::{AuthUser, OperationResult, Session, TodoContext};

/// File holding the CLI session between invocations
pub const SESSION_FILE: &str = "session.json";

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TODOLIST_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".todolist"))
        .ok_or_else(|| anyhow!("Could not find home directory; set TODOLIST_DIR"))
}

/// Get or create the todolist context
pub fn get_context() -> Result<TodoContext> {
    let data_dir = get_data_dir()?;
    TodoContext::new(&data_dir).context("Failed to initialize todolist context")
}

/// Load the saved session; a missing or unreadable file is signed out
pub fn load_session(data_dir: &Path) -> Session {
    std::fs::read_to_string(data_dir.join(SESSION_FILE))
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

pub fn save_session(data_dir: &Path, session: &Session) -> Result<()> {
    let content = serde_json::to_string_pretty(session)?;
    write_atomic(&data_dir.join(SESSION_FILE), content.as_bytes())
        .with_context(|| format!("Failed to write session in {:?}", data_dir))?;
    Ok(())
}

/// The signed-in user, or an error asking to log in
pub fn require_user(ctx: &TodoContext) -> Result<AuthUser> {
    load_session(&ctx.data_dir)
        .user
        .ok_or_else(|| anyhow!("Not signed in. Run `todo login <username>` first."))
}

/// Unwrap a service result, turning its error string into a command failure
pub fn check<T>(result: OperationResult<T>) -> Result<T> {
    match result.into_result() {
        Ok(value) => Ok(value),
        Err(error) => bail!("{}", error),
    }
}

/// Use the given password, or ask for one
///
/// Prompts on a terminal; otherwise reads one line from stdin so scripts can
/// pipe it in.
pub fn resolve_password(password: Option<String>, confirm: bool) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    if atty::is(atty::Stream::Stdin) {
        let mut prompt = dialoguer::Password::new().with_prompt("Password");
        if confirm {
            prompt = prompt.with_confirmation("Repeat password", "Passwords don't match");
        }
        return Ok(prompt.interact()?);
    }

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
