//! # hashview - hash-fragment view router
//!
//! A single-page navigation layer for static sites. Links carrying a marker
//! attribute change the address fragment; the router maps the fragment to one
//! of a few long-lived view elements, fades the old view out and the new one
//! in, restores scroll offsets on back navigation, and prefetches gallery
//! images on hover.
//!
//! ## Architecture Overview
//!
//! - **Raw messages** (`core::raw_msg`): host events as the document reports them
//! - **Messages** (`core::msg`): navigation intents, produced by the translator
//! - **Router** (`core::router`): the transition state machine, generic over
//!   a [`Dom`](infrastructure::dom::Dom) and a
//!   [`Scheduler`](infrastructure::scheduler::Scheduler)
//! - **Runtime** (`integration::runtime`): event loop dispatching messages
//!
//! ## Example Usage
//!
//! ```rust
//! use hashview::core::route::RouteTable;
//!
//! let routes = RouteTable::default();
//! let target = routes.resolve("#/work");
//! assert_eq!(target.route, "#/");
//! assert_eq!(target.section.as_deref(), Some("work"));
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Routing domain and the router
//! - [`infrastructure`] - DOM/scheduler hosts, configuration, CLI
//! - [`integration`] - Runtime and headless replay
//! - [`utils`] - Logging, panic handling, paths

#![allow(dead_code)]

pub mod core;
pub mod infrastructure;
pub mod integration;
pub mod utils;

pub use crate::core::msg::Msg;
pub use crate::core::raw_msg::RawMsg;
pub use crate::core::route::{NavigationTarget, RouteTable};
pub use crate::core::router::ViewRouter;
pub use crate::core::translator::translate_raw_to_domain;

/// Result type used throughout the library
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
