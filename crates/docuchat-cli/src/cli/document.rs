//! Document listing command.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use docuchat_client::ApiClient;
use docuchat_core::api::ChatApi;

/// List documents the backend can answer questions about.
pub async fn list_documents(api: &ApiClient, json: bool) -> Result<()> {
    let documents = api.list_documents().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
        return Ok(());
    }

    if documents.is_empty() {
        println!();
        println!(
            "  {} No documents uploaded yet.",
            style("i").blue().bold()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Status").fg(Color::White),
    ]);

    for doc in &documents {
        let status_cell = if doc.status == "Ready" {
            Cell::new("● Ready").fg(Color::Green)
        } else {
            Cell::new(&doc.status).fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&doc.name).fg(Color::Cyan),
            Cell::new(&doc.kind),
            status_cell,
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} document{}",
        style(documents.len()).bold(),
        if documents.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
