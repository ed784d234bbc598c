//! Account commands - register, login, logout, whoami

use anyhow::Result;
use colored::Colorize;
use todolist_core::Session;

use super::{check, get_context, load_session, resolve_password, save_session};
use crate::output;

pub async fn register(username: &str, password: Option<String>) -> Result<()> {
    let ctx = get_context()?;
    let password = resolve_password(password, true)?;

    let user = check(ctx.auth_service.sign_up(username, &password).await)?;

    output::success(&format!("✓ Registered {}", user.username));
    output::info(&format!("Sign in with: todo login {}", user.username));
    Ok(())
}

pub async fn login(username: &str, password: Option<String>) -> Result<()> {
    let ctx = get_context()?;
    let password = resolve_password(password, false)?;

    let user = check(ctx.auth_service.sign_in(username, &password).await)?;
    save_session(&ctx.data_dir, &Session::signed_in(user.clone()))?;

    output::success(&format!("✓ Signed in as {}", user.username));
    Ok(())
}

pub async fn logout() -> Result<()> {
    let ctx = get_context()?;
    let mut session = load_session(&ctx.data_dir);

    check(ctx.auth_service.sign_out().await)?;

    let was = session.user().map(|u| u.username.clone());
    session.clear();
    save_session(&ctx.data_dir, &session)?;

    match was {
        Some(username) => output::success(&format!("✓ Signed out {}", username)),
        None => output::info("Not signed in"),
    }
    Ok(())
}

pub fn whoami(json: bool) -> Result<()> {
    let data_dir = super::get_data_dir()?;
    let session = load_session(&data_dir);

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    match session.user() {
        Some(user) => {
            println!("{} {}", "User:".bold(), user.username);
            println!("{} {}", "Email:".bold(), user.email);
            println!("{} {}", "ID:".bold(), user.id.dimmed());
        }
        None => output::info("Not signed in"),
    }
    Ok(())
}
