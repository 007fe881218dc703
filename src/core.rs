//! Routing core
//!
//! This module contains the navigation domain:
//! - Route table and fragment resolution
//! - Raw host events, navigation messages and their translation
//! - Scroll memory and the single-flight transition guard
//! - The view router state machine

pub mod msg;
pub mod raw_msg;
pub mod route;
pub mod router;
pub mod scroll_memory;
pub mod transition;
pub mod translator;
pub mod view;
