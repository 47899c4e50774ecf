//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for session
//! management and the two-step conversation reset.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// List sessions with their numbers.
    Sessions,
    /// Switch to a session by number or id.
    Switch(String),
    /// Create a new session, optionally titled.
    New(Option<String>),
    /// Rename the active session.
    Rename(String),
    /// Request a conversation reset (needs /confirm).
    Reset,
    /// Confirm a pending reset.
    Confirm,
    /// Show the conversation so far.
    History,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts.get(1).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/sessions" | "/list" => Some(ChatCommand::Sessions),
        "/switch" | "/sw" => match arg {
            Some(target) => Some(ChatCommand::Switch(target)),
            None => Some(ChatCommand::Unknown("/switch requires a session number or id".to_string())),
        },
        "/new" => Some(ChatCommand::New(arg)),
        "/rename" => match arg {
            Some(title) => Some(ChatCommand::Rename(title)),
            None => Some(ChatCommand::Unknown("/rename requires a title".to_string())),
        },
        "/reset" => Some(ChatCommand::Reset),
        "/confirm" => Some(ChatCommand::Confirm),
        "/history" => Some(ChatCommand::History),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}      {}", style("/help").cyan(), "Show this help message");
    println!("  {}  {}", style("/sessions").cyan(), "List sessions");
    println!("  {}    {}", style("/switch").cyan(), "Switch to a session by number or id");
    println!("  {}       {}", style("/new").cyan(), "Start a new session");
    println!("  {}    {}", style("/rename").cyan(), "Rename the active session");
    println!("  {}     {}", style("/reset").cyan(), "Clear this conversation (asks to /confirm)");
    println!("  {}   {}", style("/history").cyan(), "Show the conversation so far");
    println!("  {}     {}", style("/clear").cyan(), "Clear the screen");
    println!("  {}      {}", style("/exit").cyan(), "End the chat session");
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_switch_with_target() {
        assert_eq!(
            parse("/switch 2"),
            Some(ChatCommand::Switch("2".to_string()))
        );
    }

    #[test]
    fn test_parse_switch_without_target() {
        assert!(matches!(parse("/switch"), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn test_parse_new_with_and_without_title() {
        assert_eq!(parse("/new"), Some(ChatCommand::New(None)));
        assert_eq!(
            parse("/new Dosage questions"),
            Some(ChatCommand::New(Some("Dosage questions".to_string())))
        );
    }

    #[test]
    fn test_parse_rename() {
        assert_eq!(
            parse("/rename Trial results"),
            Some(ChatCommand::Rename("Trial results".to_string()))
        );
        assert!(matches!(parse("/rename"), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn test_parse_reset_and_confirm() {
        assert_eq!(parse("/reset"), Some(ChatCommand::Reset));
        assert_eq!(parse("/confirm"), Some(ChatCommand::Confirm));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo"), Some(ChatCommand::Unknown("/foo".to_string())));
    }
}
