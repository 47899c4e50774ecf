//! Interactive chat experience.
//!
//! Implements the full chat loop: streaming answers with a thinking
//! spinner, welcome banner, slash commands for session management, and
//! the two-step conversation reset. Entry point:
//! [`loop_runner::run_chat`].

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;

pub use loop_runner::run_chat;
