//! Common utilities
//!
//! This module contains shared utility functions and helpers:
//! - Logging configuration
//! - Panic handling
//! - Path management

pub mod logging;
#[cfg(not(target_arch = "wasm32"))]
pub mod panic;
pub mod paths;

pub use logging::initialize_logging;
#[cfg(not(target_arch = "wasm32"))]
pub use panic::initialize_panic_handler;
pub use paths::{get_config_dir, get_data_dir, version};
