//! Utility Module
//!
//! - [`Clock`]: monotonic frame-delta source used by the frame loop

pub mod time;

pub use time::Clock;
