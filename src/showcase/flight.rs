//! Camera flight: the scripted keyframe path the camera follows once,
//! re-aimed at a fixed point after every position write.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::{NodeHandle, Scene, Transform};
use crate::tween::{AxisTargets, Easing, Position, Timeline, Tween};

/// One step of the flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraKeyframe {
    /// Position axes this step moves; the others keep their value.
    pub target: AxisTargets,
    /// Seconds.
    pub duration: f32,
    #[serde(default)]
    pub easing: Easing,
    /// Seconds relative to the previous step's end. Negative overlaps it.
    #[serde(default)]
    pub start_offset: f32,
}

impl CameraKeyframe {
    #[must_use]
    pub fn new(target: AxisTargets, duration: f32) -> Self {
        Self {
            target,
            duration,
            easing: Easing::None,
            start_offset: 0.0,
        }
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn with_start_offset(mut self, offset: f32) -> Self {
        self.start_offset = offset;
        self
    }

    /// The shipped seven-step path. The last step starts one second before
    /// the sixth ends.
    #[must_use]
    pub fn default_flight() -> Vec<CameraKeyframe> {
        const STEP: f32 = 3.0;
        let xyz = |x, y, z| AxisTargets::all(Vec3::new(x, y, z));
        vec![
            CameraKeyframe::new(AxisTargets::default().with_z(25.0), STEP),
            CameraKeyframe::new(AxisTargets::default().with_y(15.0), STEP),
            CameraKeyframe::new(xyz(-50.0, 15.0, 10.0), STEP),
            CameraKeyframe::new(xyz(-10.0, 20.0, -20.0), STEP),
            CameraKeyframe::new(xyz(45.0, -5.0, 12.0), STEP),
            CameraKeyframe::new(xyz(10.0, 5.0, 15.0), STEP),
            CameraKeyframe::new(xyz(-1050.0, 6.38, 5.53), 10.0).with_start_offset(-1.0),
        ]
    }
}

/// Re-orients `transform` so its forward (-Z) axis points at `target`.
pub fn look_at_point(transform: &mut Transform, target: Vec3) {
    transform.look_at(target, Vec3::Y);
}

/// Runs the keyframe timeline against one camera node.
#[derive(Debug, Clone)]
pub struct CameraFlight {
    timeline: Timeline,
    look_at: Vec3,
}

impl CameraFlight {
    #[must_use]
    pub fn new(keyframes: &[CameraKeyframe], look_at: Vec3) -> Self {
        let mut timeline = Timeline::new();
        for kf in keyframes {
            timeline.add(
                Tween::new(kf.target, kf.duration, kf.easing),
                Position::After(kf.start_offset),
            );
        }
        log::debug!(
            "camera flight: {} steps over {:.2}s",
            timeline.len(),
            timeline.duration()
        );
        Self { timeline, look_at }
    }

    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.timeline.is_complete()
    }

    /// Advances the flight by `dt` seconds, writing into `transform`.
    pub fn advance(&mut self, dt: f32, transform: &mut Transform) {
        let target = self.look_at;
        self.timeline
            .tick(dt, transform, |t| look_at_point(t, target));
    }

    /// Advances the flight on the camera node of `scene`. A missing node
    /// leaves the flight where it is.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene, camera: NodeHandle) {
        if self.is_complete() {
            return;
        }
        if let Some(node) = scene.get_node_mut(camera) {
            self.advance(dt, &mut node.transform);
        }
    }
}
