//! Boundary to the external particle subsystem
//!
//! The scene core does not simulate particles. An application that wants
//! them supplies a [`ParticleSystemManager`] when constructing the scene
//! system; the manager owns the simulation, the particle config format, and
//! the object descriptors that know how to render its collections. From the
//! core's point of view a particle object is an ordinary scene object whose
//! per-instance state happens to be a [`ParticleCollection`].

use std::path::Path;
use std::sync::Arc;

use crate::scene::SceneObjectDesc;

/// A live particle collection produced by the external engine
pub trait ParticleCollection: Send + Sync {
    /// Name of the particle system definition this collection was built from
    fn system_name(&self) -> &str;

    /// Current number of live particles
    fn particle_count(&self) -> usize;
}

/// The external particle engine
pub trait ParticleSystemManager: Send + Sync {
    /// Instantiate a collection by system name; `None` if no system with
    /// that name has been defined
    fn create_collection(
        &self,
        system_name: &str,
        delay: f32,
        random_seed: i32,
    ) -> Option<Box<dyn ParticleCollection>>;

    /// Load a particle config file, optionally precaching its systems.
    ///
    /// Returns a bare success flag; diagnosing the failure is the particle
    /// engine's business, not this core's.
    fn read_config_file(&self, path: &Path, precache: bool, decommit_temp_memory: bool) -> bool;

    /// Descriptor used for scene objects that render a particle collection
    fn particle_object_desc(&self) -> Arc<dyn SceneObjectDesc>;

    /// Descriptor for whole-scene monitor objects, drawn only through
    /// `draw_array`
    fn monitor_object_desc(&self) -> Arc<dyn SceneObjectDesc>;
}
