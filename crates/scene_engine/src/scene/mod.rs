//! The scene rendering core
//!
//! ## Architecture
//!
//! ```text
//! SceneObjectRegistry (objects + type descriptors)
//!        |
//!        | frustum cull + pass filter        (per view, per layer)
//!        v
//! SceneObjectList -> generate_primitives -> SceneLayer buffer
//!        |                                        |
//!        |            stable sort by key, partition by descriptor
//!        |                                        v
//!        +------------------------------> draw_array(RenderContext)
//! ```
//!
//! The [`RenderPipeline`] fans the per-(view, layer) work out across worker
//! threads between `finish_rendering_views` and
//! `wait_for_rendering_to_complete`; during that window the registry is
//! read-only. [`SceneSystem`] is the application-facing facade over the
//! whole thing.

mod bounds;
mod descriptor;
mod layer;
mod object;
mod object_list;
mod pipeline;
mod primitive;
mod registry;
mod system;
mod view;

pub use bounds::{Aabb, Frustum, Plane};
pub use descriptor::SceneObjectDesc;
pub use layer::{LayerDrawFn, SceneLayer};
pub use object::{ObjectState, SceneObject, SceneObjectFlags, SceneObjectKey};
pub use object_list::SceneObjectList;
pub use pipeline::{PipelineState, RenderPipeline};
pub use primitive::{depth_bucket, pack_sort_key, DrawPrimitive};
pub use registry::{SceneError, SceneObjectRegistry};
pub use system::{SceneSystem, MONITOR_OBJECT_TYPE, PARTICLE_OBJECT_TYPE};
pub use view::SceneView;
