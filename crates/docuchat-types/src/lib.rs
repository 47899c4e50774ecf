//! Shared domain types for docuchat.
//!
//! This crate contains the core domain types used across the docuchat client:
//! chat sessions, messages, stream frames, documents, and their associated
//! error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod document;
pub mod error;
pub mod stream;
