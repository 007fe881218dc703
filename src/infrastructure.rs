//! Infrastructure layer
//!
//! This module handles the router's collaborators:
//! - Document and scheduler capability traits
//! - Tokio scheduler and the headless in-memory page
//! - Browser host (`web` feature)
//! - Configuration, CLI arguments and replay scripts

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
pub mod config;
pub mod dom;
pub mod headless;
pub mod scheduler;
pub mod script;
#[cfg(feature = "web")]
pub mod web;
