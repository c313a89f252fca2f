use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::{
    binding::PropertyBinding,
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    Once,
    #[default]
    Loop,
    PingPong,
}

/// Playback state of one clip on one instance.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::default(),
            paused: false,
            enabled: true,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn with_bindings(mut self, bindings: Vec<PropertyBinding>) -> Self {
        self.bindings = bindings;
        self
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && !self.paused && self.weight > 0.0
    }

    /// Advances the local time by `dt * time_scale` and applies the loop mode.
    pub fn update(&mut self, dt: f32) {
        if self.paused || !self.enabled {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Loop => {
                self.time = self.time.rem_euclid(duration);
            }
            LoopMode::PingPong => {
                let t = self.time.rem_euclid(duration * 2.0);
                self.time = if t > duration { duration * 2.0 - t } else { t };
            }
        }
    }

    /// Samples every bound track at the current time.
    pub(crate) fn sample_bindings(&mut self, mut sink: impl FnMut(&PropertyBinding, TrackValue)) {
        let Self {
            clip,
            time,
            bindings,
            track_cursors,
            ..
        } = self;

        for binding in bindings.iter() {
            let Some(track) = clip.tracks.get(binding.track_index) else {
                continue;
            };
            let Some(cursor) = track_cursors.get_mut(binding.track_index) else {
                continue;
            };

            let value = match &track.data {
                TrackData::Vector3(t) => t.sample_with_cursor(*time, cursor).map(TrackValue::Vector3),
                TrackData::Quaternion(t) => {
                    t.sample_with_cursor(*time, cursor).map(TrackValue::Quaternion)
                }
            };
            if let Some(value) = value {
                sink(binding, value);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}

impl TrackValue {
    /// Moves `self` toward `other` by `t`; mismatched kinds keep `self`.
    #[must_use]
    pub fn blend(self, other: TrackValue, t: f32) -> TrackValue {
        match (self, other) {
            (TrackValue::Vector3(a), TrackValue::Vector3(b)) => TrackValue::Vector3(a.lerp(b, t)),
            (TrackValue::Quaternion(a), TrackValue::Quaternion(b)) => {
                TrackValue::Quaternion(a.slerp(b, t))
            }
            (lhs, _) => lhs,
        }
    }
}
