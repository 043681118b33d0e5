//! Transient object lists produced by scene traversal
//!
//! A [`SceneObjectList`] is the result of one filtering pass over the
//! registry (typically a frustum test). It lives for a single layer's
//! accumulation and is rebuilt from scratch every frame; holding one across
//! frames is always a bug.

use super::{Frustum, SceneObjectFlags, SceneObjectKey, SceneObjectRegistry};

/// Ordered set of object handles that passed a filter
#[derive(Debug, Default)]
pub struct SceneObjectList {
    keys: Vec<SceneObjectKey>,
}

impl SceneObjectList {
    /// Objects whose flags contain `pass_flag`, in registry storage order.
    ///
    /// Deferred-type objects are skipped; they have nothing to generate yet.
    pub fn filtered(registry: &SceneObjectRegistry, pass_flag: SceneObjectFlags) -> Self {
        Self {
            keys: registry
                .iter()
                .filter(|(_, object)| {
                    object.desc().is_some() && object.flags().contains(pass_flag)
                })
                .map(|(key, _)| key)
                .collect(),
        }
    }

    /// Flag-filtered objects whose bounds intersect the frustum, in registry
    /// storage order
    pub fn from_frustum(
        registry: &SceneObjectRegistry,
        frustum: &Frustum,
        pass_flag: SceneObjectFlags,
    ) -> Self {
        Self {
            keys: registry
                .iter()
                .filter(|(_, object)| {
                    object.desc().is_some()
                        && object.flags().contains(pass_flag)
                        && frustum.intersects_aabb(object.bounds())
                })
                .map(|(key, _)| key)
                .collect(),
        }
    }

    /// Number of surviving objects
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the filter rejected everything
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate the surviving handles in filter order
    pub fn iter(&self) -> impl Iterator<Item = SceneObjectKey> + '_ {
        self.keys.iter().copied()
    }
}
