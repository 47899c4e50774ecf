//! CLI command definitions and dispatch for the `docuchat` binary.
//!
//! Uses clap derive macros for argument parsing. Session management is
//! verb-first (`docuchat sessions`, `docuchat rename <id> <title>`); the
//! interactive chat loop lives under `docuchat chat`.

pub mod ask;
pub mod chat;
pub mod document;
pub mod export;
pub mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Chat with your documents.
#[derive(Parser)]
#[command(name = "docuchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Backend base URL (overrides DOCUCHAT_API_URL and the config file).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat {
        /// Session id to resume (defaults to the most recent session).
        #[arg(long)]
        session: Option<String>,
    },

    /// Ask a single question and print the answer.
    Ask {
        /// The question to ask.
        question: String,

        /// Session id to attach the question to.
        #[arg(long)]
        session: Option<String>,
    },

    /// List chat sessions.
    #[command(alias = "ls")]
    Sessions,

    /// Create a new chat session.
    New {
        /// Title for the new session.
        title: Option<String>,
    },

    /// Rename a chat session.
    Rename {
        /// Session id.
        id: String,
        /// New title.
        title: String,
    },

    /// Delete a chat session.
    Delete {
        /// Session id.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// List documents available for question answering.
    Docs,

    /// Export a session transcript as sanitized HTML.
    Export {
        /// Session id.
        id: String,
        /// Output file path.
        #[arg(short, long, default_value = "transcript.html")]
        output: PathBuf,
    },
}
