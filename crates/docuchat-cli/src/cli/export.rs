//! Export a session transcript as a standalone HTML page.
//!
//! Message content passes through the sanitizing renderer, so the written
//! file is safe to open in a browser regardless of what the conversation
//! contains.

use std::path::Path;

use anyhow::Result;
use console::style;

use docuchat_client::ApiClient;
use docuchat_core::api::ChatApi;
use docuchat_core::render;
use docuchat_types::chat::ChatMessage;

/// Fetch a session's messages and write them as an HTML transcript.
pub async fn export_session(api: &ApiClient, id: &str, output: &Path) -> Result<()> {
    let messages = api.chat_messages(id).await?;
    let html = render_transcript(id, &messages);
    tokio::fs::write(output, html).await?;

    println!();
    println!(
        "  {} Exported {} message{} to {}",
        style("*").cyan().bold(),
        style(messages.len()).bold(),
        if messages.len() == 1 { "" } else { "s" },
        style(output.display()).cyan()
    );
    println!();
    Ok(())
}

fn render_transcript(session_id: &str, messages: &[ChatMessage]) -> String {
    let mut body = String::new();
    for message in messages {
        let mut classes = format!("message {}", message.role);
        if message.is_error {
            classes.push_str(" error");
        }
        body.push_str(&format!(
            "    <div class=\"{classes}\">\n      <div class=\"meta\">{} · {}</div>\n      <div class=\"content\">{}</div>\n    </div>\n",
            message.role,
            message.timestamp.format("%Y-%m-%d %H:%M UTC"),
            render::render(&message.content),
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>docuchat transcript {session_id}</title>\n<style>\n  body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }}\n  .message {{ margin: 1rem 0; padding: 0.5rem 1rem; border-radius: 8px; }}\n  .message.user {{ background: #eef; }}\n  .message.assistant {{ background: #f6f6f6; }}\n  .message.error {{ background: #fee; }}\n  .meta {{ color: #888; font-size: 0.8rem; }}\n  .answer-box {{ border: 2px solid #46a; padding: 0.5rem; border-radius: 6px; }}\n</style>\n</head>\n<body>\n  <h1>Transcript: {session_id}</h1>\n{body}</body>\n</html>\n"
    )
}
