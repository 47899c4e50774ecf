//! Async readline input for the chat loop.
//!
//! Wraps `rustyline_async::Readline` so the loop can await a line while
//! spinners and log output keep working, with EOF (Ctrl+D) and interrupt
//! (Ctrl+C) surfaced as events.

use rustyline_async::{Readline, ReadlineError, SharedWriter};

/// Events produced by the prompt.
#[derive(Debug)]
pub enum PromptEvent {
    /// User submitted a line (already trimmed).
    Line(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

/// Async prompt wrapping rustyline_async.
pub struct ChatPrompt {
    rl: Readline,
}

impl ChatPrompt {
    /// Create a prompt; the returned `SharedWriter` prints without
    /// clobbering the input line.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, writer) = Readline::new(prompt)?;
        Ok((Self { rl }, writer))
    }

    /// Wait for the next input event.
    pub async fn read_line(&mut self) -> PromptEvent {
        match self.rl.readline().await {
            Ok(rustyline_async::ReadlineEvent::Line(line)) => {
                PromptEvent::Line(line.trim().to_string())
            }
            Ok(rustyline_async::ReadlineEvent::Eof) => PromptEvent::Eof,
            Ok(rustyline_async::ReadlineEvent::Interrupted) => PromptEvent::Interrupted,
            Err(_) => PromptEvent::Eof,
        }
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }
}
