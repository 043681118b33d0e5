//! Frame pipeline: collect views, fan out layer work, join
//!
//! The pipeline is a small state machine driven from the main thread:
//!
//! ```text
//! Idle --begin_rendering_views--> Collecting --finish_rendering_views--> Joining
//!   ^                                                                      |
//!   +------------------wait_for_rendering_to_complete---------------------+
//! ```
//!
//! `finish_rendering_views` schedules one job per (view, layer) pair and
//! returns immediately; `wait_for_rendering_to_complete` is the single join
//! point. Between the two, the scene is read-only and the only legal
//! pipeline calls are the dynamic-view entry points. Calling anything else
//! out of order is a programming error and fails an assertion rather than
//! returning a recoverable error: a state mismatch here means the frame is
//! already corrupt.

use std::sync::{Arc, RwLock};

use super::{Frustum, SceneObjectRegistry, SceneView};
use crate::core::config::SceneSystemConfig;
use crate::jobs::JobPool;
use crate::render::RenderDevice;

/// Pipeline lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No frame in progress; the scene may be mutated
    Idle,
    /// Between begin and finish; views are being collected
    Collecting,
    /// Work is dispatched; waiting for the join
    Joining,
}

/// Orchestrates per-view, per-layer rendering across the worker pool
pub struct RenderPipeline {
    state: PipelineState,
    device: Option<Arc<dyn RenderDevice>>,
    views: Vec<Arc<SceneView>>,
    registry: Arc<RwLock<SceneObjectRegistry>>,
    jobs: JobPool,
    config: SceneSystemConfig,
}

impl RenderPipeline {
    /// Create a pipeline over a shared registry
    pub fn new(registry: Arc<RwLock<SceneObjectRegistry>>, config: SceneSystemConfig) -> Self {
        let jobs = JobPool::new(config.effective_worker_threads());
        Self {
            state: PipelineState::Idle,
            device: None,
            views: Vec::new(),
            registry,
            jobs,
            config,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Whether the scene may be mutated right now
    pub fn accepts_scene_mutation(&self) -> bool {
        self.state == PipelineState::Idle
    }

    /// Bind the render device and open view collection for a new frame
    pub fn begin_rendering_views(&mut self, device: Arc<dyn RenderDevice>) {
        assert_eq!(
            self.state,
            PipelineState::Idle,
            "begin_rendering_views called while a frame is already in progress"
        );
        log::trace!("frame begin");
        self.device = Some(device);
        self.state = PipelineState::Collecting;
    }

    /// Register a view for this frame
    pub fn add_view(&mut self, frustum: Frustum) -> Arc<SceneView> {
        assert_eq!(
            self.state,
            PipelineState::Collecting,
            "add_view is only legal between begin_rendering_views and finish_rendering_views"
        );
        let view = Arc::new(SceneView::new(frustum));
        self.views.push(Arc::clone(&view));
        view
    }

    /// Dispatch every collected view's layers to the workers and return
    /// without blocking
    pub fn finish_rendering_views(&mut self) {
        assert_eq!(
            self.state,
            PipelineState::Collecting,
            "finish_rendering_views requires a begin_rendering_views first"
        );
        self.state = PipelineState::Joining;

        let views: Vec<_> = self.views.iter().map(Arc::clone).collect();
        log::trace!("dispatching {} views", views.len());
        for view in &views {
            self.dispatch_view(view);
        }
    }

    /// Create a view mid-render, for frusta that depend on already-dispatched
    /// work (a reflection probe, for example).
    ///
    /// The view is not scheduled until
    /// [`begin_rendering_dynamic_view`](Self::begin_rendering_dynamic_view).
    pub fn add_dynamic_view(&mut self, frustum: Frustum) -> Arc<SceneView> {
        assert_eq!(
            self.state,
            PipelineState::Joining,
            "dynamic views can only be created after finish_rendering_views and before wait"
        );
        let view = Arc::new(SceneView::new(frustum));
        self.views.push(Arc::clone(&view));
        view
    }

    /// Schedule a dynamic view's layers immediately; its work joins at the
    /// same fence as everything else
    pub fn begin_rendering_dynamic_view(&mut self, view: &Arc<SceneView>) {
        assert_eq!(
            self.state,
            PipelineState::Joining,
            "dynamic views can only be dispatched while a frame is rendering"
        );
        assert!(
            !view.is_dispatched(),
            "dynamic view has already been dispatched"
        );
        self.dispatch_view(view);
    }

    /// Block until every dispatched job has completed, then reset for the
    /// next frame.
    ///
    /// Only after this returns is it safe to mutate scene objects or begin
    /// another frame.
    pub fn wait_for_rendering_to_complete(&mut self) {
        assert_eq!(
            self.state,
            PipelineState::Joining,
            "wait_for_rendering_to_complete must follow finish_rendering_views"
        );
        self.jobs.wait_idle();
        log::trace!("frame complete");

        self.views.clear();
        self.device = None;
        self.state = PipelineState::Idle;
    }

    fn dispatch_view(&self, view: &Arc<SceneView>) {
        let device = self
            .device
            .as_ref()
            .map(Arc::clone)
            .expect("render device is bound while a frame is active");

        for layer in view.mark_dispatched() {
            let registry = Arc::clone(&self.registry);
            let view = Arc::clone(view);
            let device = Arc::clone(&device);
            let config = self.config.clone();

            self.jobs.execute(move || {
                let registry = registry.read().unwrap();
                let mut ctx = device.create_context();
                layer.render(&registry, &view, ctx.as_mut(), &config);
                device.submit(ctx);
            });
        }
    }
}

impl std::fmt::Debug for RenderPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("state", &self.state)
            .field("views", &self.views.len())
            .field("workers", &self.jobs.worker_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{MaterialDrawMode, NullDevice, RenderViewport};

    fn pipeline() -> RenderPipeline {
        let registry = Arc::new(RwLock::new(SceneObjectRegistry::new()));
        let config = SceneSystemConfig {
            worker_threads: 2,
            ..Default::default()
        };
        RenderPipeline::new(registry, config)
    }

    #[test]
    fn test_full_lifecycle_returns_to_idle() {
        let mut pipeline = pipeline();
        assert_eq!(pipeline.state(), PipelineState::Idle);

        pipeline.begin_rendering_views(Arc::new(NullDevice::new()));
        assert_eq!(pipeline.state(), PipelineState::Collecting);

        let view = pipeline.add_view(Frustum::unbounded());
        view.add_render_layer(RenderViewport::new(0, 0, 64, 64), MaterialDrawMode::Regular);

        pipeline.finish_rendering_views();
        assert_eq!(pipeline.state(), PipelineState::Joining);

        pipeline.wait_for_rendering_to_complete();
        assert_eq!(pipeline.state(), PipelineState::Idle);
        assert!(pipeline.accepts_scene_mutation());
    }

    #[test]
    #[should_panic(expected = "add_view is only legal")]
    fn test_add_view_before_begin_panics() {
        let mut pipeline = pipeline();
        let _ = pipeline.add_view(Frustum::unbounded());
    }

    #[test]
    #[should_panic(expected = "already in progress")]
    fn test_double_begin_panics() {
        let mut pipeline = pipeline();
        pipeline.begin_rendering_views(Arc::new(NullDevice::new()));
        pipeline.begin_rendering_views(Arc::new(NullDevice::new()));
    }

    #[test]
    #[should_panic(expected = "must follow finish_rendering_views")]
    fn test_wait_without_finish_panics() {
        let mut pipeline = pipeline();
        pipeline.begin_rendering_views(Arc::new(NullDevice::new()));
        pipeline.wait_for_rendering_to_complete();
    }

    #[test]
    #[should_panic(expected = "dynamic views can only be created")]
    fn test_dynamic_view_while_collecting_panics() {
        let mut pipeline = pipeline();
        pipeline.begin_rendering_views(Arc::new(NullDevice::new()));
        let _ = pipeline.add_dynamic_view(Frustum::unbounded());
    }

    #[test]
    fn test_dynamic_view_joins_with_frame() {
        let mut pipeline = pipeline();
        pipeline.begin_rendering_views(Arc::new(NullDevice::new()));
        let _ = pipeline.add_view(Frustum::unbounded());
        pipeline.finish_rendering_views();

        let probe = pipeline.add_dynamic_view(Frustum::unbounded());
        probe.add_render_layer(RenderViewport::new(0, 0, 16, 16), MaterialDrawMode::Regular);
        pipeline.begin_rendering_dynamic_view(&probe);

        pipeline.wait_for_rendering_to_complete();
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }
}
