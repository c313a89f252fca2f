use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::Transform;
use crate::tween::easing::Easing;

/// Partial `Vec3` target. Axes left as `None` are never written.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisTargets {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl AxisTargets {
    #[must_use]
    pub fn all(v: Vec3) -> Self {
        Self {
            x: Some(v.x),
            y: Some(v.y),
            z: Some(v.z),
        }
    }

    #[must_use]
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }

    #[must_use]
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }

    #[must_use]
    pub fn with_z(mut self, z: f32) -> Self {
        self.z = Some(z);
        self
    }

    /// Fills the unnamed axes from `fallback`.
    #[must_use]
    pub fn resolve(&self, fallback: Vec3) -> Vec3 {
        Vec3::new(
            self.x.unwrap_or(fallback.x),
            self.y.unwrap_or(fallback.y),
            self.z.unwrap_or(fallback.z),
        )
    }
}

/// Something with a `Vec3` a tween can drive.
pub trait Tweenable {
    fn tween_value(&self) -> Vec3;
    fn set_tween_value(&mut self, value: Vec3);
}

impl Tweenable for Vec3 {
    fn tween_value(&self) -> Vec3 {
        *self
    }

    fn set_tween_value(&mut self, value: Vec3) {
        *self = value;
    }
}

/// Transforms tween their position.
impl Tweenable for Transform {
    fn tween_value(&self) -> Vec3 {
        self.position
    }

    fn set_tween_value(&mut self, value: Vec3) {
        self.position = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenState {
    /// Playhead has not reached the tween.
    Pending,
    /// Start values captured, end not reached.
    Active,
    /// Final state rendered; no further writes.
    Complete,
}

#[derive(Debug, Clone)]
pub struct Tween {
    pub target: AxisTargets,
    pub duration: f32,
    pub easing: Easing,
    start: Option<Vec3>,
    state: TweenState,
}

impl Tween {
    #[must_use]
    pub fn new(target: AxisTargets, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            duration: duration.max(0.0),
            easing,
            start: None,
            state: TweenState::Pending,
        }
    }

    #[must_use]
    pub fn state(&self) -> TweenState {
        self.state
    }

    /// Values captured when the playhead first reached this tween.
    #[must_use]
    pub fn start_values(&self) -> Option<Vec3> {
        self.start
    }

    /// Linear progress at `local_time` seconds after the tween's start.
    #[must_use]
    pub fn progress(&self, local_time: f32) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (local_time / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Renders the tween at `local_time` into `target`.
    ///
    /// Returns whether anything was written. Start values are captured on
    /// the first render; once progress reaches 1 the exact target values are
    /// written and the tween completes.
    pub fn render<T: Tweenable + ?Sized>(&mut self, local_time: f32, target: &mut T) -> bool {
        if self.state == TweenState::Complete || local_time < 0.0 {
            return false;
        }

        let current = target.tween_value();
        let start = *self.start.get_or_insert(current);
        self.state = TweenState::Active;

        let p = self.progress(local_time);
        let value = if p >= 1.0 {
            self.state = TweenState::Complete;
            self.target.resolve(current)
        } else {
            let e = self.easing.apply(p);
            let lerp = |axis: Option<f32>, from: f32, keep: f32| {
                axis.map_or(keep, |to| from + (to - from) * e)
            };
            Vec3::new(
                lerp(self.target.x, start.x, current.x),
                lerp(self.target.y, start.y, current.y),
                lerp(self.target.z, start.z, current.z),
            )
        };

        target.set_tween_value(value);
        true
    }
}
