//! Scene objects and their handles
//!
//! Objects are owned exclusively by the [`SceneObjectRegistry`]; callers
//! hold [`SceneObjectKey`] handles. An object is its type descriptor, a
//! pass-filter flag mask, cullable bounds, a world transform, and whatever
//! per-instance state its descriptor's factory built.
//!
//! [`SceneObjectRegistry`]: super::SceneObjectRegistry

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use slotmap::new_key_type;

use super::{Aabb, SceneObjectDesc};
use crate::foundation::math::{Mat4, Vec3};

new_key_type! {
    /// Stable handle to a scene object owned by the registry
    pub struct SceneObjectKey;
}

bitflags! {
    /// Pass-filter mask controlling which layer draw modes include an object
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SceneObjectFlags: u32 {
        /// Rendered by regular forward layers
        const DRAW_REGULAR = 1 << 0;
        /// Rendered by gbuffer-output layers
        const DRAW_LIGHT_PREPASS = 1 << 1;
        /// Rendered by deferred second-pass layers
        const DRAW_LIGHT_POSTPASS = 1 << 2;
        /// Rendered in every draw mode
        const DRAW_ALL = Self::DRAW_REGULAR.bits()
            | Self::DRAW_LIGHT_PREPASS.bits()
            | Self::DRAW_LIGHT_POSTPASS.bits();
    }
}

/// Opaque per-instance state built by a descriptor's factory
pub type ObjectState = Box<dyn Any + Send + Sync>;

/// One renderable instance
///
/// Mutated by application code between frames only; while a frame is in
/// flight every object is read-only to the render workers.
pub struct SceneObject {
    key: SceneObjectKey,
    desc: Option<Arc<dyn SceneObjectDesc>>,
    flags: SceneObjectFlags,
    bounds: Aabb,
    transform: Mat4,
    state: ObjectState,
}

impl SceneObject {
    pub(crate) fn new(
        key: SceneObjectKey,
        desc: Option<Arc<dyn SceneObjectDesc>>,
        flags: SceneObjectFlags,
        state: ObjectState,
    ) -> Self {
        Self {
            key,
            desc,
            flags,
            bounds: Aabb::new(Vec3::zeros(), Vec3::zeros()),
            transform: Mat4::identity(),
            state,
        }
    }

    /// This object's own registry handle, for stamping into primitives
    pub fn key(&self) -> SceneObjectKey {
        self.key
    }

    /// The object's type descriptor; `None` until a deferred object is
    /// specialized
    pub fn desc(&self) -> Option<&Arc<dyn SceneObjectDesc>> {
        self.desc.as_ref()
    }

    /// Pass-filter flags
    pub fn flags(&self) -> SceneObjectFlags {
        self.flags
    }

    /// Cullable world-space bounds
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// World transform
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Downcast the per-instance state to its concrete type
    pub fn state<T: Any>(&self) -> Option<&T> {
        self.state.downcast_ref::<T>()
    }

    /// Mutable downcast of the per-instance state
    pub fn state_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.state.downcast_mut::<T>()
    }

    pub(crate) fn set_desc(&mut self, desc: Arc<dyn SceneObjectDesc>, state: ObjectState) {
        self.desc = Some(desc);
        self.state = state;
    }

    pub(crate) fn set_flags(&mut self, flags: SceneObjectFlags) {
        self.flags = flags;
    }

    pub(crate) fn set_bounds(&mut self, mins: Vec3, maxes: Vec3) {
        self.bounds = Aabb::new(mins, maxes);
    }

    pub(crate) fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }
}

impl fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneObject")
            .field("typed", &self.desc.is_some())
            .field("flags", &self.flags)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_downcast() {
        let mut object = SceneObject::new(
            SceneObjectKey::default(),
            None,
            SceneObjectFlags::DRAW_REGULAR,
            Box::new(42u32),
        );

        assert_eq!(object.state::<u32>(), Some(&42));
        assert_eq!(object.state::<String>(), None);

        *object.state_mut::<u32>().unwrap() = 7;
        assert_eq!(object.state::<u32>(), Some(&7));
    }

    #[test]
    fn test_draw_all_covers_every_pass() {
        let all = SceneObjectFlags::DRAW_ALL;
        assert!(all.contains(SceneObjectFlags::DRAW_REGULAR));
        assert!(all.contains(SceneObjectFlags::DRAW_LIGHT_PREPASS));
        assert!(all.contains(SceneObjectFlags::DRAW_LIGHT_POSTPASS));
    }
}
