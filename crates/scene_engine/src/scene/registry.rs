//! Object registry: type table and object storage
//!
//! The registry owns every scene object and the name → descriptor table.
//! Handles are slotmap keys, so they stay valid across unrelated insertions
//! and removals and go stale (not dangling) after release.

use std::collections::HashMap;
use std::sync::Arc;

use slotmap::SlotMap;
use thiserror::Error;

use super::{ObjectState, SceneObject, SceneObjectDesc, SceneObjectFlags, SceneObjectKey};
use crate::core::config::ConfigError;
use crate::foundation::math::{Mat4, Vec3};

/// Recoverable scene-system failures
///
/// Contract violations (mutating objects mid-frame, pipeline calls out of
/// order) are not represented here; those are programming errors and fail
/// on assertions instead.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Lookup by a name that was never registered
    #[error("no object type named `{0}` is registered")]
    NotFound(String),

    /// Registration under a name that is already taken
    #[error("object type `{0}` is already registered")]
    DuplicateName(String),

    /// A descriptor that does not belong to this scene's type table
    #[error("descriptor is not registered with this scene")]
    InvalidDescriptor,

    /// Particle operation without a particle manager wired in
    #[error("no particle subsystem is available")]
    ParticlesUnavailable,

    /// Configuration failure during system construction
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Owner of all scene objects and registered object types
#[derive(Default)]
pub struct SceneObjectRegistry {
    types: HashMap<String, Arc<dyn SceneObjectDesc>>,
    objects: SlotMap<SceneObjectKey, SceneObject>,
}

impl SceneObjectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under a case-sensitive name.
    ///
    /// Duplicate names are rejected rather than overwritten: a silent
    /// re-registration would retype every live object of that name's type.
    pub fn register_object_type(
        &mut self,
        name: &str,
        desc: Arc<dyn SceneObjectDesc>,
    ) -> Result<(), SceneError> {
        if self.types.contains_key(name) {
            return Err(SceneError::DuplicateName(name.to_string()));
        }
        log::debug!("registered object type `{name}`");
        self.types.insert(name.to_string(), desc);
        Ok(())
    }

    /// Look up a registered descriptor by name
    pub fn object_type_desc(&self, name: &str) -> Result<Arc<dyn SceneObjectDesc>, SceneError> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    /// Create an object of a registered type.
    ///
    /// The descriptor must be one obtained from this registry; a foreign
    /// descriptor fails with [`SceneError::InvalidDescriptor`].
    pub fn create_object(
        &mut self,
        desc: &Arc<dyn SceneObjectDesc>,
        flags: SceneObjectFlags,
    ) -> Result<SceneObjectKey, SceneError> {
        let state = desc.create_state();
        self.create_object_with_state(desc, flags, state)
    }

    /// Create an object of a registered type with externally built state.
    ///
    /// Used where the per-instance state comes from a collaborator (for
    /// example a particle collection) rather than the descriptor's factory.
    pub fn create_object_with_state(
        &mut self,
        desc: &Arc<dyn SceneObjectDesc>,
        flags: SceneObjectFlags,
        state: ObjectState,
    ) -> Result<SceneObjectKey, SceneError> {
        if !self.is_registered(desc) {
            return Err(SceneError::InvalidDescriptor);
        }
        Ok(self
            .objects
            .insert_with_key(|key| SceneObject::new(key, Some(Arc::clone(desc)), flags, state)))
    }

    /// Create an object whose concrete type will be decided later.
    ///
    /// Deferred objects are skipped by rendering until
    /// [`set_object_type`](Self::set_object_type) specializes them.
    pub fn create_object_deferred(&mut self, flags: SceneObjectFlags) -> SceneObjectKey {
        self.objects
            .insert_with_key(|key| SceneObject::new(key, None, flags, Box::new(())))
    }

    /// Specialize an object to a registered type, replacing its state with
    /// the descriptor's freshly built state
    pub fn set_object_type(
        &mut self,
        key: SceneObjectKey,
        desc: &Arc<dyn SceneObjectDesc>,
    ) -> Result<(), SceneError> {
        if !self.is_registered(desc) {
            return Err(SceneError::InvalidDescriptor);
        }
        let Some(object) = self.objects.get_mut(key) else {
            debug_assert!(false, "stale scene object handle");
            return Ok(());
        };
        object.set_desc(Arc::clone(desc), desc.create_state());
        Ok(())
    }

    /// Update an object's cullable bounds
    pub fn set_object_bounds(&mut self, key: SceneObjectKey, mins: Vec3, maxes: Vec3) {
        let Some(object) = self.objects.get_mut(key) else {
            debug_assert!(false, "stale scene object handle");
            return;
        };
        object.set_bounds(mins, maxes);
    }

    /// Update an object's world transform
    pub fn set_object_transform(&mut self, key: SceneObjectKey, transform: Mat4) {
        let Some(object) = self.objects.get_mut(key) else {
            debug_assert!(false, "stale scene object handle");
            return;
        };
        object.set_transform(transform);
    }

    /// Update an object's pass-filter flags
    pub fn set_object_flags(&mut self, key: SceneObjectKey, flags: SceneObjectFlags) {
        let Some(object) = self.objects.get_mut(key) else {
            debug_assert!(false, "stale scene object handle");
            return;
        };
        object.set_flags(flags);
    }

    /// Destroy an object, invalidating its handle
    pub fn release_object(&mut self, key: SceneObjectKey) {
        if self.objects.remove(key).is_none() {
            debug_assert!(false, "stale scene object handle");
        }
    }

    /// Borrow an object
    pub fn object(&self, key: SceneObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// Mutably borrow an object
    pub fn object_mut(&mut self, key: SceneObjectKey) -> Option<&mut SceneObject> {
        self.objects.get_mut(key)
    }

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Iterate live objects in stable storage order
    pub fn iter(&self) -> impl Iterator<Item = (SceneObjectKey, &SceneObject)> {
        self.objects.iter()
    }

    fn is_registered(&self, desc: &Arc<dyn SceneObjectDesc>) -> bool {
        self.types
            .values()
            .any(|registered| Arc::ptr_eq(registered, desc))
    }
}
