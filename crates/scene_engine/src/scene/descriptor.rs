//! Per-type object descriptors
//!
//! A descriptor is the strategy shared by every object of one registered
//! type: it builds per-instance state, converts object state into draw
//! primitives for a view/layer, and submits sorted primitive runs to a
//! command context. One descriptor instance serves all of its objects across
//! all concurrently rendering views, so implementations must treat `&self`
//! as genuinely shared during rendering.

use super::{DrawPrimitive, ObjectState, SceneLayer, SceneObject, SceneView};
use crate::render::RenderContext;

/// Type strategy for scene objects
pub trait SceneObjectDesc: Send + Sync {
    /// Build the per-instance state for a new object of this type
    fn create_state(&self) -> ObjectState;

    /// Convert one object's state into draw primitives for a view/layer.
    ///
    /// Appends at most `max` primitives to `out` and returns the number
    /// written. Generation must be resumable: when a call fills its budget
    /// exactly, the caller may call again with `start` advanced past the
    /// primitives already written, and the pieces must concatenate into the
    /// same sequence one unbounded call would have produced. Buffer
    /// exhaustion is the rare path, so a simple "skip `start`, emit up to
    /// `max`" implementation is fine.
    ///
    /// The default emits nothing, for types rendered only through
    /// [`draw_array`](Self::draw_array).
    fn generate_primitives(
        &self,
        _object: &SceneObject,
        _start: usize,
        _max: usize,
        _out: &mut Vec<DrawPrimitive>,
        _view: &SceneView,
        _layer: &SceneLayer,
    ) -> usize {
        0
    }

    /// Submit one sorted, contiguous run of primitives this descriptor
    /// generated.
    ///
    /// Runs arrive ordered by sort key. Implementations must not panic: a
    /// half-recorded command stream cannot be unwound, so internal failures
    /// should be logged and swallowed.
    fn draw_array(
        &self,
        _ctx: &mut dyn RenderContext,
        _primitives: &[DrawPrimitive],
        _view: &SceneView,
        _layer: &SceneLayer,
    ) {
    }
}
