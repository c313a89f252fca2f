use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::assets::prefab::PrefabInstance;

pub struct Binder;

impl Binder {
    /// Resolves the clip's tracks against the nodes of one prefab instance.
    ///
    /// Tracks pointing outside the instance are dropped.
    #[must_use]
    pub fn bind(instance: &PrefabInstance, clip: &AnimationClip) -> Vec<PropertyBinding> {
        clip.tracks
            .iter()
            .enumerate()
            .filter_map(|(track_index, track)| {
                let node_handle = instance.node(track.meta.node_index)?;
                Some(PropertyBinding {
                    track_index,
                    node_handle,
                    target: track.meta.target,
                })
            })
            .collect()
    }
}
