//! Scene views: one render-target configuration and its layers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{Frustum, LayerDrawFn, SceneLayer};
use crate::render::{MaterialDrawMode, RenderContext, RenderViewport};

/// One scene render: a frustum plus an ordered set of layers
///
/// Views are created by the pipeline (statically during collection, or
/// dynamically mid-render) and handed back as `Arc`s so callers can keep
/// attaching layers until the view is dispatched. After dispatch the layer
/// set is frozen; adding to a dispatched view is a contract violation.
pub struct SceneView {
    frustum: Frustum,
    layers: Mutex<Vec<Arc<SceneLayer>>>,
    dispatched: AtomicBool,
}

impl SceneView {
    pub(crate) fn new(frustum: Frustum) -> Self {
        Self {
            frustum,
            layers: Mutex::new(Vec::new()),
            dispatched: AtomicBool::new(false),
        }
    }

    /// The frustum this view culls against
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Append a standard layer that runs the cull/generate/sort/submit
    /// pipeline for one draw mode
    pub fn add_render_layer(
        &self,
        viewport: RenderViewport,
        draw_mode: MaterialDrawMode,
    ) -> Arc<SceneLayer> {
        self.push_layer(SceneLayer::standard(viewport, draw_mode))
    }

    /// Append a procedural layer rendered entirely by `draw_fn`
    pub fn add_procedural_layer(
        &self,
        viewport: RenderViewport,
        draw_fn: impl Fn(&SceneView, &mut dyn RenderContext, &SceneLayer) + Send + Sync + 'static,
    ) -> Arc<SceneLayer> {
        let draw_fn: LayerDrawFn = Arc::new(draw_fn);
        self.push_layer(SceneLayer::procedural(viewport, draw_fn))
    }

    /// The view's layers in render order
    pub fn layers(&self) -> Vec<Arc<SceneLayer>> {
        self.layers.lock().unwrap().clone()
    }

    /// Number of layers attached so far
    pub fn layer_count(&self) -> usize {
        self.layers.lock().unwrap().len()
    }

    /// Whether this view's work has been handed to the workers
    pub fn is_dispatched(&self) -> bool {
        self.dispatched.load(Ordering::Acquire)
    }

    /// Freeze the layer set and return it for scheduling
    pub(crate) fn mark_dispatched(&self) -> Vec<Arc<SceneLayer>> {
        let layers = self.layers.lock().unwrap().clone();
        self.dispatched.store(true, Ordering::Release);
        layers
    }

    fn push_layer(&self, layer: SceneLayer) -> Arc<SceneLayer> {
        assert!(
            !self.is_dispatched(),
            "layers cannot be added to a view that has already been dispatched"
        );
        let layer = Arc::new(layer);
        self.layers.lock().unwrap().push(Arc::clone(&layer));
        layer
    }
}

impl std::fmt::Debug for SceneView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneView")
            .field("layer_count", &self.layer_count())
            .field("dispatched", &self.is_dispatched())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_keep_insertion_order() {
        let view = SceneView::new(Frustum::unbounded());
        view.add_render_layer(RenderViewport::new(0, 0, 64, 64), MaterialDrawMode::Regular);
        view.add_render_layer(
            RenderViewport::new(0, 0, 32, 32),
            MaterialDrawMode::LightPrepass,
        );

        let layers = view.layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].draw_mode(), Some(MaterialDrawMode::Regular));
        assert_eq!(layers[1].draw_mode(), Some(MaterialDrawMode::LightPrepass));
    }

    #[test]
    #[should_panic(expected = "already been dispatched")]
    fn test_adding_layer_after_dispatch_panics() {
        let view = SceneView::new(Frustum::unbounded());
        view.add_render_layer(RenderViewport::new(0, 0, 64, 64), MaterialDrawMode::Regular);
        let _ = view.mark_dispatched();

        view.add_render_layer(RenderViewport::new(0, 0, 64, 64), MaterialDrawMode::Regular);
    }

    #[test]
    fn test_procedural_layer_kind() {
        let view = SceneView::new(Frustum::unbounded());
        let layer = view.add_procedural_layer(RenderViewport::new(0, 0, 8, 8), |_, _, _| {});

        assert!(layer.is_procedural());
        assert_eq!(layer.draw_mode(), None);
    }
}
