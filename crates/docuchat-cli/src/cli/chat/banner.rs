//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
///
/// Shows the backend URL, the active session, and a hint about slash
/// commands. Offline mode is called out explicitly so the user knows
/// nothing is being persisted.
pub fn print_welcome_banner(backend_url: &str, session_title: &str, session_id: &str, offline: bool) {
    println!();
    println!("  {} {}", style("docuchat").cyan().bold(), style(backend_url).dim());
    println!();
    println!(
        "  {}  {} ({})",
        style("Session:").bold(),
        style(session_title).cyan(),
        style(&session_id[..12.min(session_id.len())]).dim()
    );
    if offline {
        println!(
            "  {}  {}",
            style("Offline:").bold(),
            style("backend unreachable, messages will not be saved").yellow()
        );
    }
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
