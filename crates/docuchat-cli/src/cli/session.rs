//! One-shot session management commands.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use docuchat_client::ApiClient;
use docuchat_core::api::ChatApi;

/// List sessions as a table (most recently updated first, backend order).
pub async fn list_sessions(api: &ApiClient, json: bool) -> Result<()> {
    let sessions = api.list_chats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions yet. Start one with: {}",
            style("i").blue().bold(),
            style("docuchat chat").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Id").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
        Cell::new("Last Message").fg(Color::White),
    ]);

    for session in &sessions {
        let preview = if session.last_message.chars().count() > 50 {
            let clipped: String = session.last_message.chars().take(47).collect();
            format!("{clipped}...")
        } else {
            session.last_message.clone()
        };

        table.add_row(vec![
            Cell::new(&session.id).fg(Color::DarkGrey),
            Cell::new(&session.title).fg(Color::Cyan),
            Cell::new(session.message_count),
            Cell::new(format_relative_time(&session.updated_at)).fg(Color::DarkGrey),
            Cell::new(preview),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Create a session and print its backend-assigned id.
pub async fn new_session(api: &ApiClient, title: Option<&str>, json: bool) -> Result<()> {
    let title = title.unwrap_or("New Chat");
    let session = api.create_chat(title).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Created session {} ({})",
        style("+").green().bold(),
        style(&session.title).cyan(),
        style(&session.id).dim()
    );
    println!();
    Ok(())
}

/// Rename a session. Empty titles are rejected before any request.
pub async fn rename_session(api: &ApiClient, id: &str, title: &str) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("title cannot be empty");
    }

    api.rename_chat(id, title).await?;
    println!();
    println!(
        "  {} Renamed {} to {}",
        style("*").cyan().bold(),
        style(id).dim(),
        style(title).cyan()
    );
    println!();
    Ok(())
}

/// Delete a session after confirmation.
pub async fn delete_session(api: &ApiClient, id: &str, force: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete session '{}' and its messages?",
                style(id).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    api.delete_chat(id).await?;
    println!();
    println!("  {} Deleted session {}", style("-").red().bold(), style(id).dim());
    println!();
    Ok(())
}

fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let diff = now - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}
