//! Render layers: per-pass primitive accumulation and submission
//!
//! A layer is the accumulation target for one render pass of one view.
//! Standard layers run the generic pipeline: cull, generate primitives,
//! stable-sort by key, then submit contiguous same-descriptor runs.
//! Procedural layers bypass all of that and call a caller-supplied render
//! function against the command context.

use std::sync::{Arc, Mutex};

use super::{
    DrawPrimitive, SceneObjectDesc, SceneObjectList, SceneObjectRegistry, SceneView,
};
use crate::core::config::{OverflowPolicy, SceneSystemConfig};
use crate::render::{MaterialDrawMode, RenderContext, RenderViewport};

/// Caller-supplied render function for procedural layers
pub type LayerDrawFn = Arc<dyn Fn(&SceneView, &mut dyn RenderContext, &SceneLayer) + Send + Sync>;

enum LayerKind {
    Standard { draw_mode: MaterialDrawMode },
    Procedural { draw_fn: LayerDrawFn },
}

/// Accumulation target for one render pass of one view
pub struct SceneLayer {
    viewport: RenderViewport,
    kind: LayerKind,
    // retained after the frame so callers can inspect what was submitted
    primitives: Mutex<Vec<DrawPrimitive>>,
}

impl SceneLayer {
    pub(crate) fn standard(viewport: RenderViewport, draw_mode: MaterialDrawMode) -> Self {
        Self {
            viewport,
            kind: LayerKind::Standard { draw_mode },
            primitives: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn procedural(viewport: RenderViewport, draw_fn: LayerDrawFn) -> Self {
        Self {
            viewport,
            kind: LayerKind::Procedural { draw_fn },
            primitives: Mutex::new(Vec::new()),
        }
    }

    /// The viewport this layer renders into
    pub fn viewport(&self) -> &RenderViewport {
        &self.viewport
    }

    /// The draw mode of a standard layer; `None` for procedural layers
    pub fn draw_mode(&self) -> Option<MaterialDrawMode> {
        match &self.kind {
            LayerKind::Standard { draw_mode } => Some(*draw_mode),
            LayerKind::Procedural { .. } => None,
        }
    }

    /// Whether this layer renders through a caller-supplied function
    pub fn is_procedural(&self) -> bool {
        matches!(self.kind, LayerKind::Procedural { .. })
    }

    /// Number of primitives submitted in the most recent frame
    pub fn primitive_count(&self) -> usize {
        self.primitives.lock().unwrap().len()
    }

    /// Snapshot of the most recent frame's sorted primitives
    pub fn primitives(&self) -> Vec<DrawPrimitive> {
        self.primitives.lock().unwrap().clone()
    }

    /// Sort keys of the most recent frame's primitives, in submission order
    pub fn sort_keys(&self) -> Vec<u32> {
        self.primitives
            .lock()
            .unwrap()
            .iter()
            .map(|primitive| primitive.sort_key)
            .collect()
    }

    /// Render this layer into a command context.
    ///
    /// Called from exactly one worker per frame; the registry is read-only
    /// for the duration.
    pub(crate) fn render(
        &self,
        registry: &SceneObjectRegistry,
        view: &SceneView,
        ctx: &mut dyn RenderContext,
        config: &SceneSystemConfig,
    ) {
        ctx.set_viewport(&self.viewport);

        match &self.kind {
            LayerKind::Procedural { draw_fn } => {
                draw_fn(view, ctx, self);
            }
            LayerKind::Standard { draw_mode } => {
                let mut primitives = self.accumulate(registry, view, *draw_mode, config);

                // stable sort: equal keys keep generation order, which makes
                // frame output reproducible
                primitives.sort_by_key(|primitive| primitive.sort_key);

                self.submit_runs(registry, view, ctx, &primitives);

                *self.primitives.lock().unwrap() = primitives;
            }
        }
    }

    /// Cull, then drain every surviving object's primitives through the
    /// resume protocol.
    fn accumulate(
        &self,
        registry: &SceneObjectRegistry,
        view: &SceneView,
        draw_mode: MaterialDrawMode,
        config: &SceneSystemConfig,
    ) -> Vec<DrawPrimitive> {
        let pass_flag = draw_mode.pass_flag();
        let list = if config.enable_culling {
            SceneObjectList::from_frustum(registry, view.frustum(), pass_flag)
        } else {
            SceneObjectList::filtered(registry, pass_flag)
        };

        let mut out = Vec::with_capacity(config.layer_buffer_capacity);
        let mut capacity = config.layer_buffer_capacity;

        'objects: for key in list.iter() {
            let Some(object) = registry.object(key) else {
                continue;
            };
            let Some(desc) = object.desc() else {
                continue;
            };

            let mut start = 0;
            loop {
                let budget = capacity.saturating_sub(out.len());
                if budget == 0 {
                    match config.overflow_policy {
                        OverflowPolicy::Grow => {
                            capacity *= 2;
                            continue;
                        }
                        OverflowPolicy::Drop => {
                            log::warn!(
                                "layer primitive buffer full ({capacity}); dropping remaining primitives this frame"
                            );
                            break 'objects;
                        }
                    }
                }

                let before = out.len();
                let written = desc.generate_primitives(object, start, budget, &mut out, view, self);
                debug_assert_eq!(
                    out.len(),
                    before + written,
                    "descriptor wrote a different number of primitives than it reported"
                );

                if written < budget {
                    // short write means the object is exhausted
                    break;
                }
                start += written;
            }
        }

        out
    }

    /// Partition sorted primitives into maximal same-descriptor runs and
    /// submit each run once.
    fn submit_runs(
        &self,
        registry: &SceneObjectRegistry,
        view: &SceneView,
        ctx: &mut dyn RenderContext,
        primitives: &[DrawPrimitive],
    ) {
        let desc_of = |primitive: &DrawPrimitive| -> Option<Arc<dyn SceneObjectDesc>> {
            registry
                .object(primitive.object)
                .and_then(|object| object.desc().cloned())
        };

        let mut run_start = 0;
        while run_start < primitives.len() {
            let Some(desc) = desc_of(&primitives[run_start]) else {
                run_start += 1;
                continue;
            };

            let mut run_end = run_start + 1;
            while run_end < primitives.len() {
                match desc_of(&primitives[run_end]) {
                    Some(next) if Arc::ptr_eq(&next, &desc) => run_end += 1,
                    _ => break,
                }
            }

            desc.draw_array(ctx, &primitives[run_start..run_end], view, self);
            run_start = run_end;
        }
    }
}

impl std::fmt::Debug for SceneLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneLayer")
            .field("viewport", &self.viewport)
            .field("draw_mode", &self.draw_mode())
            .field("procedural", &self.is_procedural())
            .field("primitive_count", &self.primitive_count())
            .finish()
    }
}
