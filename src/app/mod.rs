//! Application frontends.
//!
//! - [`winit`]: desktop window and event loop

pub mod winit;

pub use self::winit::{App, AppHandler};
