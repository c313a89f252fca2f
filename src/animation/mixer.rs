use std::collections::HashMap;
use std::sync::Arc;

use crate::animation::action::{AnimationAction, TrackValue};
use crate::animation::binder::Binder;
use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::assets::prefab::PrefabInstance;
use crate::scene::{NodeHandle, Scene};

/// Drives the actions of one model instance.
///
/// When several active actions target the same node property their samples
/// are blended in proportion to the action weights.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
    time: f32,
    blend: HashMap<(NodeHandle, TargetPath), (TrackValue, f32)>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: AnimationAction) {
        self.actions.push(action);
    }

    /// Binds `clip` to `instance` and starts it looping.
    pub fn play(&mut self, clip: &Arc<AnimationClip>, instance: &PrefabInstance) {
        let bindings = Binder::bind(instance, clip);
        log::debug!(
            "mixer: playing '{}' ({} of {} tracks bound)",
            clip.name,
            bindings.len(),
            clip.tracks.len()
        );
        self.add_action(AnimationAction::new(Arc::clone(clip)).with_bindings(bindings));
    }

    #[must_use]
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    #[must_use]
    pub fn list_animations(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.clip().name.as_str()).collect()
    }

    /// Total time this mixer has been advanced by.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advances all actions by `dt` seconds and writes the blended pose into
    /// the scene.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        self.time += dt;

        for action in &mut self.actions {
            action.update(dt);
        }

        self.blend.clear();
        let blend = &mut self.blend;
        for action in &mut self.actions {
            if !action.is_active() {
                continue;
            }
            let weight = action.weight;
            action.sample_bindings(|binding, value| {
                blend
                    .entry((binding.node_handle, binding.target))
                    .and_modify(|(acc, acc_weight)| {
                        *acc_weight += weight;
                        *acc = acc.blend(value, weight / *acc_weight);
                    })
                    .or_insert((value, weight));
            });
        }

        for (&(handle, target), &(value, _)) in &self.blend {
            let Some(node) = scene.get_node_mut(handle) else {
                continue;
            };
            match (target, value) {
                (TargetPath::Translation, TrackValue::Vector3(v)) => node.transform.position = v,
                (TargetPath::Scale, TrackValue::Vector3(v)) => node.transform.scale = v,
                (TargetPath::Rotation, TrackValue::Quaternion(q)) => node.transform.rotation = q,
                _ => {}
            }
        }
    }
}
