//! Infrastructure layer for docuchat.
//!
//! Contains the concrete [`api::ApiClient`] implementing the
//! [`ChatApi`](docuchat_core::api::ChatApi) port over HTTP (reqwest), the
//! incremental decoder for the backend's streaming answer protocol, wire
//! DTOs with one-shot shape normalization, and config file loading.

pub mod api;
pub mod config;
pub mod streaming;
pub mod wire;

pub use api::ApiClient;
