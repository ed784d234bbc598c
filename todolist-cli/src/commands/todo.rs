//! Todo commands - list, add, done, remove

use anyhow::Result;
use colored::Colorize;

use super::{check, get_context, require_user};
use crate::output;

pub async fn list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;

    let todos = check(ctx.todo_service.get_todos(&user.id).await)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&todos)?);
        return Ok(());
    }

    if todos.is_empty() {
        output::info("No todos yet. Add one with: todo add <task>");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["", "Task", "Created", "ID"]);
    for todo in &todos {
        let mark = if todo.completed { "✓".green().to_string() } else { " ".to_string() };
        table.add_row(vec![
            mark,
            todo.task.clone(),
            output::format_timestamp(&todo.created_at),
            todo.id.clone(),
        ]);
    }
    println!("{table}");

    let open = todos.iter().filter(|t| !t.completed).count();
    println!("{} open, {} total", open, todos.len());
    Ok(())
}

pub async fn add(task: &str) -> Result<()> {
    let ctx = get_context()?;
    let user = require_user(&ctx)?;

    let todo = check(ctx.todo_service.add_todo(&user.id, task).await)?;

    output::success(&format!("✓ Added: {}", todo.task));
    println!("{}", todo.id.dimmed());
    Ok(())
}

pub async fn done(id: &str, completed: bool) -> Result<()> {
    let ctx = get_context()?;
    require_user(&ctx)?;

    let todo = check(ctx.todo_service.set_completed(id, completed).await)?;

    if todo.completed {
        output::success(&format!("✓ Done: {}", todo.task));
    } else {
        output::info(&format!("Reopened: {}", todo.task));
    }
    Ok(())
}

pub async fn remove(id: &str) -> Result<()> {
    let ctx = get_context()?;
    require_user(&ctx)?;

    check(ctx.todo_service.delete_todo(id).await)?;

    output::success(&format!("✓ Deleted {}", id));
    Ok(())
}
