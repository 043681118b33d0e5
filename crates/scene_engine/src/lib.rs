//! # Scene Engine
//!
//! A frame-oriented scene rendering core. The engine owns a registry of
//! renderable objects, groups draw work into per-view, per-layer draw lists,
//! and executes those lists asynchronously on worker threads while the main
//! thread prepares the next frame.
//!
//! ## Frame lifecycle
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scene_engine::prelude::*;
//!
//! fn frame(scene: &mut SceneSystem, device: Arc<dyn RenderDevice>, frustum: Frustum) {
//!     scene.begin_rendering_views(device);
//!     let view = scene.add_view(frustum);
//!     view.add_render_layer(RenderViewport::new(0, 0, 1280, 720), MaterialDrawMode::Regular);
//!     scene.finish_rendering_views();
//!     // worker threads build and submit the draw lists here
//!     scene.wait_for_rendering_to_complete();
//!     // only now is it safe to mutate scene objects again
//! }
//! ```
//!
//! GPU command encoding, shader compilation, and the particle simulation
//! itself live behind the [`render::RenderDevice`] and
//! [`particles::ParticleSystemManager`] boundaries; this crate only schedules
//! the CPU-side work that turns a set of views into ordered draw batches.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod foundation;
pub mod jobs;
pub mod particles;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::core::config::{OverflowPolicy, SceneSystemConfig};
    pub use crate::foundation::math::{Mat4, Transform, Vec3};
    pub use crate::render::{
        Material, MaterialDrawDescriptor, MaterialDrawMode, RenderContext, RenderDevice,
        RenderViewport,
    };
    pub use crate::scene::{
        Aabb, DrawPrimitive, Frustum, SceneError, SceneLayer, SceneObject, SceneObjectDesc,
        SceneObjectFlags, SceneObjectKey, SceneSystem, SceneView,
    };
}
