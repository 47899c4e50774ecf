//! Main chat loop orchestration.
//!
//! Coordinates the complete conversation lifecycle: session loading,
//! welcome banner, input loop with streamed answers, slash commands, and
//! the two-step conversation reset.

use anyhow::Result;
use console::style;

use docuchat_client::ApiClient;
use docuchat_core::chat::controller::{ConversationController, SendOutcome};
use docuchat_core::chat::store::SessionStore;
use docuchat_types::chat::{ChatMessage, MessageRole};

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatPrompt, PromptEvent};

/// Run the interactive chat loop.
pub async fn run_chat(api: ApiClient, session: Option<&str>, verbose: bool) -> Result<()> {
    let backend_url = api.base_url().to_string();

    let mut store = SessionStore::new(api);
    store.init().await?;
    if let Some(id) = session {
        store
            .select(id)
            .await
            .map_err(|e| anyhow::anyhow!("could not open session '{id}': {e}"))?;
    }
    let mut controller = ConversationController::new(store);

    {
        let Some(active) = controller.store().active_session() else {
            anyhow::bail!("no session could be selected or created");
        };
        print_welcome_banner(
            &backend_url,
            &active.title,
            &active.id,
            controller.store().is_offline(),
        );
    }
    for message in controller.store().messages() {
        print_message(message);
    }
    println!();

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut input, _writer) = ChatPrompt::new(prompt)
        .map_err(|e| anyhow::anyhow!("failed to initialize input: {e}"))?;

    loop {
        match input.read_line().await {
            PromptEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            PromptEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            PromptEvent::Line(text) => {
                if text.is_empty() {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => commands::print_help(),
                        ChatCommand::Clear => input.clear(),
                        ChatCommand::Exit => {
                            println!("\n  {}", style("Session ended.").dim());
                            break;
                        }
                        ChatCommand::Sessions => print_session_list(&controller),
                        ChatCommand::Switch(target) => switch_session(&mut controller, &target).await,
                        ChatCommand::New(title) => {
                            match controller
                                .store_mut()
                                .create(title.as_deref().unwrap_or(""))
                                .await
                            {
                                Ok(session) => {
                                    println!(
                                        "\n  {} Started {} ({})\n",
                                        style("+").green().bold(),
                                        style(&session.title).cyan(),
                                        style(&session.id).dim()
                                    );
                                }
                                Err(e) => print_error(&format!("Could not create session: {e}")),
                            }
                        }
                        ChatCommand::Rename(title) => {
                            let Some(active_id) = controller.store().active_id().map(str::to_string)
                            else {
                                print_error("No active session.");
                                continue;
                            };
                            match controller.store_mut().rename(&active_id, &title).await {
                                Ok(()) => println!(
                                    "\n  {} Renamed to {}\n",
                                    style("*").cyan().bold(),
                                    style(title.trim()).cyan()
                                ),
                                Err(e) => print_error(&format!("Rename failed: {e}")),
                            }
                        }
                        ChatCommand::Reset => match controller.request_reset() {
                            Ok(()) => println!(
                                "\n  {} This will clear the conversation. Type {} to proceed.\n",
                                style("!").yellow().bold(),
                                style("/confirm").cyan()
                            ),
                            Err(e) => print_error(&e.to_string()),
                        },
                        ChatCommand::Confirm => match controller.confirm_reset() {
                            Ok(()) => println!("\n  {} Conversation cleared.\n", style("*").cyan().bold()),
                            Err(_) => print_error("Nothing is waiting for confirmation."),
                        },
                        ChatCommand::History => {
                            println!();
                            for message in controller.store().messages() {
                                print_message(message);
                            }
                            println!();
                        }
                        ChatCommand::Unknown(cmd_name) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                                style("?").yellow().bold(),
                                style(cmd_name).dim()
                            );
                        }
                    }
                    continue;
                }

                send_and_print(&mut controller, &text, verbose).await;
            }
        }
    }

    Ok(())
}

/// Send one message and print the resulting assistant reply.
async fn send_and_print(
    controller: &mut ConversationController<ApiClient>,
    text: &str,
    verbose: bool,
) {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("spinner template is valid"),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let outcome = controller.send_message(text).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(SendOutcome::Answered) | Ok(SendOutcome::Failed) => {
            if verbose {
                if let Some(debug) = controller.last_debug() {
                    println!(
                        "  {}",
                        style(format!("[{}] {}", debug.intent, debug.message)).dim()
                    );
                }
            }
            if let Some(message) = controller.store().messages().last() {
                print_message(message);
                print_metadata_footer(message);
            }
            println!();
        }
        Ok(SendOutcome::Cancelled) => {
            println!("\n  {}\n", style("Request cancelled.").dim());
        }
        Err(e) => print_error(&format!("Could not send message: {e}")),
    }
}

async fn switch_session(controller: &mut ConversationController<ApiClient>, target: &str) {
    // Accept a 1-based list number or a session id.
    let resolved = match target.parse::<usize>() {
        Ok(n) if n >= 1 => controller
            .store()
            .sessions()
            .get(n - 1)
            .map(|s| s.id.clone()),
        _ => controller
            .store()
            .sessions()
            .iter()
            .find(|s| s.id == target)
            .map(|s| s.id.clone()),
    };
    let Some(id) = resolved else {
        print_error(&format!("No session '{target}'. Try /sessions."));
        return;
    };

    match controller.store_mut().select(&id).await {
        Ok(()) => {
            let title = controller
                .store()
                .active_session()
                .map(|s| s.title.clone())
                .unwrap_or_default();
            println!("\n  {} Switched to {}\n", style("*").cyan().bold(), style(title).cyan());
            for message in controller.store().messages() {
                print_message(message);
            }
            println!();
        }
        Err(e) => print_error(&format!("Could not switch: {e}")),
    }
}

fn print_session_list(controller: &ConversationController<ApiClient>) {
    println!();
    for (i, session) in controller.store().sessions().iter().enumerate() {
        let marker = if controller.store().active_id() == Some(session.id.as_str()) {
            style(">").green().bold().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {marker} {} {} {}",
            style(i + 1).bold(),
            style(&session.title).cyan(),
            style(format!("({} messages)", session.message_count)).dim()
        );
    }
    println!();
}

fn print_error(message: &str) {
    println!("\n  {} {}\n", style("!").red().bold(), style(message).red());
}

fn print_message(message: &ChatMessage) {
    match message.role {
        MessageRole::User => {
            println!("  {} {}", style("You >").green().bold(), message.content);
        }
        MessageRole::Assistant if message.is_error => {
            println!("  {} {}", style("! >").red().bold(), style(&message.content).red());
        }
        MessageRole::Assistant => {
            println!("  {} {}", style("Bot >").cyan().bold(), message.content);
        }
        MessageRole::System => {
            println!("  {}", style(&message.content).dim());
        }
    }
}

/// Print the retrieval footer after an answer:
/// `| doc1.pdf · score 0.83 · 3 documents considered`
fn print_metadata_footer(message: &ChatMessage) {
    let Some(metadata) = &message.metadata else {
        return;
    };
    let mut parts: Vec<String> = Vec::new();
    if let Some(doc) = &metadata.selected_document {
        parts.push(doc.clone());
    }
    if let Some(score) = metadata.selection_score {
        parts.push(format!("score {score:.2}"));
    }
    if let Some(n) = metadata.documents_considered {
        parts.push(format!("{n} documents considered"));
    }
    if parts.is_empty() {
        return;
    }
    println!(
        "  {} {}",
        style("|").dim(),
        style(parts.join(" \u{00b7} ")).dim()
    );
}
