//! Event loop and replay driver
//!
//! - Router runtime translating host events into navigations
//! - Headless replay of navigation scripts

pub mod replay;
pub mod runtime;
