//! Tweening
//!
//! A small GSAP-style timeline: eased, partial `Vec3` tweens placed
//! end-to-end (or overlapping) and rendered in declared order.

pub mod easing;
pub mod timeline;
#[allow(clippy::module_inception)]
pub mod tween;

pub use easing::{EaseDirection, Easing};
pub use timeline::{Position, Timeline};
pub use tween::{AxisTargets, Tween, TweenState, Tweenable};
