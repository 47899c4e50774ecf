//! Conversation logic and the backend port trait for docuchat.
//!
//! This crate defines the [`api::ChatApi`] port that the infrastructure
//! layer implements, the session store and conversation controller built
//! on top of it, and the content renderer that turns untrusted answer
//! text into safe HTML. It depends only on `docuchat-types` -- never on
//! an HTTP client crate.

pub mod api;
pub mod chat;
pub mod render;
