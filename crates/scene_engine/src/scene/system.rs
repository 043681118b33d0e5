//! Scene system facade
//!
//! [`SceneSystem`] ties the registry, the frame pipeline, and the optional
//! particle subsystem together behind one surface. Applications register
//! object types and create objects here between frames, then drive the
//! `begin / add_view / finish / wait` lifecycle each frame.
//!
//! Collaborators are explicit constructor dependencies; there is no global
//! scene instance and no global particle manager.

use std::path::Path;
use std::sync::{Arc, RwLock};

use super::{
    Frustum, RenderPipeline, SceneError, SceneObject, SceneObjectDesc, SceneObjectFlags,
    SceneObjectKey, SceneObjectRegistry, SceneView,
};
use crate::core::config::SceneSystemConfig;
use crate::foundation::math::{Mat4, Vec3};
use crate::particles::{ParticleCollection, ParticleSystemManager};
use crate::render::RenderDevice;
use crate::scene::PipelineState;

/// Registered type name for particle collection objects
pub const PARTICLE_OBJECT_TYPE: &str = "particle_system";

/// Registered type name for whole-scene monitor objects
pub const MONITOR_OBJECT_TYPE: &str = "monitor";

/// The scene rendering core: object registry + frame pipeline + particles
pub struct SceneSystem {
    registry: Arc<RwLock<SceneObjectRegistry>>,
    pipeline: RenderPipeline,
    particles: Option<Arc<dyn ParticleSystemManager>>,
}

impl SceneSystem {
    /// Create a scene system without a particle subsystem
    pub fn new(config: SceneSystemConfig) -> Result<Self, SceneError> {
        config.validate()?;
        log::info!(
            "scene system starting: {} workers, {} primitive buffer",
            config.effective_worker_threads(),
            config.layer_buffer_capacity
        );

        let registry = Arc::new(RwLock::new(SceneObjectRegistry::new()));
        let pipeline = RenderPipeline::new(Arc::clone(&registry), config);
        Ok(Self {
            registry,
            pipeline,
            particles: None,
        })
    }

    /// Create a scene system wired to an external particle engine.
    ///
    /// The engine's object descriptors are registered under
    /// [`PARTICLE_OBJECT_TYPE`] and [`MONITOR_OBJECT_TYPE`].
    pub fn with_particles(
        config: SceneSystemConfig,
        particles: Arc<dyn ParticleSystemManager>,
    ) -> Result<Self, SceneError> {
        let mut system = Self::new(config)?;
        {
            let mut registry = system.registry.write().unwrap();
            registry.register_object_type(PARTICLE_OBJECT_TYPE, particles.particle_object_desc())?;
            registry.register_object_type(MONITOR_OBJECT_TYPE, particles.monitor_object_desc())?;
        }
        system.particles = Some(particles);
        Ok(system)
    }

    /// Join any in-flight frame and log shutdown.
    ///
    /// Dropping the system performs the same join implicitly; this exists
    /// for callers that want an explicit, logged teardown point.
    pub fn shutdown(&mut self) {
        if self.pipeline.state() == PipelineState::Joining {
            self.pipeline.wait_for_rendering_to_complete();
        }
        log::info!("scene system shut down");
    }

    // -- object types -------------------------------------------------------

    /// Register a descriptor under a case-sensitive type name
    pub fn register_object_type(
        &self,
        name: &str,
        desc: Arc<dyn SceneObjectDesc>,
    ) -> Result<(), SceneError> {
        self.assert_mutable();
        self.registry.write().unwrap().register_object_type(name, desc)
    }

    /// Look up a registered descriptor by name
    pub fn object_type_desc(&self, name: &str) -> Result<Arc<dyn SceneObjectDesc>, SceneError> {
        self.registry.read().unwrap().object_type_desc(name)
    }

    // -- objects ------------------------------------------------------------

    /// Create an object of a registered type
    pub fn create_object(
        &self,
        desc: &Arc<dyn SceneObjectDesc>,
        flags: SceneObjectFlags,
    ) -> Result<SceneObjectKey, SceneError> {
        self.assert_mutable();
        self.registry.write().unwrap().create_object(desc, flags)
    }

    /// Create an object whose concrete type is decided later
    pub fn create_object_deferred(&self, flags: SceneObjectFlags) -> SceneObjectKey {
        self.assert_mutable();
        self.registry.write().unwrap().create_object_deferred(flags)
    }

    /// Specialize a deferred object to a registered type
    pub fn set_object_type(
        &self,
        key: SceneObjectKey,
        desc: &Arc<dyn SceneObjectDesc>,
    ) -> Result<(), SceneError> {
        self.assert_mutable();
        self.registry.write().unwrap().set_object_type(key, desc)
    }

    /// Update an object's cullable bounds
    pub fn set_object_bounds(&self, key: SceneObjectKey, mins: Vec3, maxes: Vec3) {
        self.assert_mutable();
        self.registry.write().unwrap().set_object_bounds(key, mins, maxes);
    }

    /// Update an object's world transform
    pub fn set_object_transform(&self, key: SceneObjectKey, transform: Mat4) {
        self.assert_mutable();
        self.registry
            .write()
            .unwrap()
            .set_object_transform(key, transform);
    }

    /// Update an object's pass-filter flags
    pub fn set_object_flags(&self, key: SceneObjectKey, flags: SceneObjectFlags) {
        self.assert_mutable();
        self.registry.write().unwrap().set_object_flags(key, flags);
    }

    /// Destroy an object
    pub fn release_object(&self, key: SceneObjectKey) {
        self.assert_mutable();
        self.registry.write().unwrap().release_object(key);
    }

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        self.registry.read().unwrap().object_count()
    }

    /// Read an object through a closure; `None` for a stale handle
    pub fn with_object<R>(
        &self,
        key: SceneObjectKey,
        f: impl FnOnce(&SceneObject) -> R,
    ) -> Option<R> {
        self.registry.read().unwrap().object(key).map(f)
    }

    /// Mutate an object through a closure; `None` for a stale handle
    pub fn with_object_mut<R>(
        &self,
        key: SceneObjectKey,
        f: impl FnOnce(&mut SceneObject) -> R,
    ) -> Option<R> {
        self.assert_mutable();
        self.registry.write().unwrap().object_mut(key).map(f)
    }

    // -- frame lifecycle ----------------------------------------------------

    /// Bind the render device and open view collection for a new frame
    pub fn begin_rendering_views(&mut self, device: Arc<dyn RenderDevice>) {
        self.pipeline.begin_rendering_views(device);
    }

    /// Register a view for this frame
    pub fn add_view(&mut self, frustum: Frustum) -> Arc<SceneView> {
        self.pipeline.add_view(frustum)
    }

    /// Dispatch all collected views to the workers; returns immediately
    pub fn finish_rendering_views(&mut self) {
        self.pipeline.finish_rendering_views();
    }

    /// Create a view mid-render (between finish and wait)
    pub fn add_dynamic_view(&mut self, frustum: Frustum) -> Arc<SceneView> {
        self.pipeline.add_dynamic_view(frustum)
    }

    /// Dispatch a mid-render view immediately
    pub fn begin_rendering_dynamic_view(&mut self, view: &Arc<SceneView>) {
        self.pipeline.begin_rendering_dynamic_view(view);
    }

    /// Block until the dispatched frame has fully rendered
    pub fn wait_for_rendering_to_complete(&mut self) {
        self.pipeline.wait_for_rendering_to_complete();
    }

    /// Current pipeline state
    pub fn pipeline_state(&self) -> PipelineState {
        self.pipeline.state()
    }

    // -- particles ----------------------------------------------------------

    /// The particle manager, if one was supplied
    pub fn particle_manager(&self) -> Option<&Arc<dyn ParticleSystemManager>> {
        self.particles.as_ref()
    }

    /// Create a scene object rendering a named particle system.
    ///
    /// Fails with [`SceneError::ParticlesUnavailable`] when no particle
    /// manager was supplied and [`SceneError::NotFound`] when the engine has
    /// no system with that name.
    pub fn create_particle_object(
        &self,
        system_name: &str,
        delay: f32,
        random_seed: i32,
    ) -> Result<SceneObjectKey, SceneError> {
        self.assert_mutable();
        let particles = self
            .particles
            .as_ref()
            .ok_or(SceneError::ParticlesUnavailable)?;
        let collection = particles
            .create_collection(system_name, delay, random_seed)
            .ok_or_else(|| SceneError::NotFound(system_name.to_string()))?;

        let desc = particles.particle_object_desc();
        self.registry.write().unwrap().create_object_with_state(
            &desc,
            SceneObjectFlags::DRAW_REGULAR,
            Box::new(collection),
        )
    }

    /// Create a whole-scene monitor object
    pub fn create_monitor_object(&self) -> Result<SceneObjectKey, SceneError> {
        self.assert_mutable();
        let particles = self
            .particles
            .as_ref()
            .ok_or(SceneError::ParticlesUnavailable)?;
        let desc = particles.monitor_object_desc();
        self.registry
            .write()
            .unwrap()
            .create_object(&desc, SceneObjectFlags::DRAW_REGULAR)
    }

    /// Instantiate a particle collection without wrapping it in a scene
    /// object
    pub fn create_particle_collection(
        &self,
        system_name: &str,
        delay: f32,
        random_seed: i32,
    ) -> Result<Box<dyn ParticleCollection>, SceneError> {
        let particles = self
            .particles
            .as_ref()
            .ok_or(SceneError::ParticlesUnavailable)?;
        particles
            .create_collection(system_name, delay, random_seed)
            .ok_or_else(|| SceneError::NotFound(system_name.to_string()))
    }

    /// Load a particle config file through the particle engine.
    ///
    /// Success flag only; `false` when no particle manager is wired in.
    pub fn read_particle_config_file(
        &self,
        path: &Path,
        precache: bool,
        decommit_temp_memory: bool,
    ) -> bool {
        match &self.particles {
            Some(particles) => particles.read_config_file(path, precache, decommit_temp_memory),
            None => {
                log::warn!(
                    "particle config {} requested without a particle subsystem",
                    path.display()
                );
                false
            }
        }
    }

    fn assert_mutable(&self) {
        debug_assert!(
            self.pipeline.accepts_scene_mutation(),
            "scene objects must not be mutated while a frame is rendering"
        );
    }
}

impl Drop for SceneSystem {
    fn drop(&mut self) {
        if self.pipeline.state() == PipelineState::Joining {
            self.pipeline.wait_for_rendering_to_complete();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::logging;
    use crate::render::{
        InputLayoutId, MaterialDrawDescriptor, MaterialDrawMode, NullDevice, RecordingDevice,
        RenderCommand, RenderContext, RenderViewport, ShaderId, TextureId,
    };
    use crate::scene::{pack_sort_key, DrawPrimitive, ObjectState, SceneLayer, SceneObject};

    /// Test object type: emits a configurable number of primitives, each
    /// carrying a key from the object's state
    struct CubeDesc {
        draw_op: Arc<MaterialDrawDescriptor>,
    }

    struct CubeState {
        sort_keys: Vec<u32>,
    }

    impl CubeDesc {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                draw_op: Arc::new(MaterialDrawDescriptor {
                    texture: TextureId(0),
                    vertex_shader: ShaderId(0),
                    pixel_shader: ShaderId(0),
                }),
            })
        }
    }

    impl SceneObjectDesc for CubeDesc {
        fn create_state(&self) -> ObjectState {
            Box::new(CubeState {
                sort_keys: vec![pack_sort_key(1, 0)],
            })
        }

        fn generate_primitives(
            &self,
            object: &SceneObject,
            start: usize,
            max: usize,
            out: &mut Vec<DrawPrimitive>,
            _view: &SceneView,
            _layer: &SceneLayer,
        ) -> usize {
            let Some(state) = object.state::<CubeState>() else {
                return 0;
            };
            let end = state.sort_keys.len().min(start + max);
            for key in &state.sort_keys[start..end] {
                out.push(DrawPrimitive {
                    sort_key: *key,
                    transform: *object.transform(),
                    draw_op: Arc::clone(&self.draw_op),
                    object: object.key(),
                });
            }
            end.saturating_sub(start)
        }

        fn draw_array(
            &self,
            ctx: &mut dyn RenderContext,
            primitives: &[DrawPrimitive],
            _view: &SceneView,
            _layer: &SceneLayer,
        ) {
            for primitive in primitives {
                ctx.bind(&primitive.draw_op, InputLayoutId(0));
                ctx.draw(&primitive.transform, 36);
            }
        }
    }

    fn test_config() -> SceneSystemConfig {
        SceneSystemConfig {
            worker_threads: 2,
            ..Default::default()
        }
    }

    /// Ortho frustum spanning x in [-5, 35], generous on the other axes
    fn test_frustum() -> Frustum {
        Frustum::from_view_projection(&Mat4::new_orthographic(
            -5.0, 35.0, -100.0, 100.0, -100.0, 100.0,
        ))
    }

    fn spawn_cube(system: &SceneSystem, desc: &Arc<dyn SceneObjectDesc>, x: f32, keys: Vec<u32>) -> SceneObjectKey {
        let key = system
            .create_object(desc, SceneObjectFlags::DRAW_REGULAR)
            .unwrap();
        system.set_object_bounds(
            key,
            Vec3::new(x - 0.5, -0.5, -0.5),
            Vec3::new(x + 0.5, 0.5, 0.5),
        );
        system.with_object_mut(key, |object| {
            object.state_mut::<CubeState>().unwrap().sort_keys = keys;
        });
        key
    }

    fn run_frame(system: &mut SceneSystem, device: Arc<dyn RenderDevice>) -> Arc<SceneLayer> {
        system.begin_rendering_views(device);
        let view = system.add_view(test_frustum());
        let layer =
            view.add_render_layer(RenderViewport::new(0, 0, 640, 480), MaterialDrawMode::Regular);
        system.finish_rendering_views();
        system.wait_for_rendering_to_complete();
        layer
    }

    #[test]
    fn test_cube_culling_scenario() {
        logging::init_for_tests();
        let mut system = SceneSystem::new(test_config()).unwrap();
        let desc: Arc<dyn SceneObjectDesc> = CubeDesc::new();
        system.register_object_type("Cube", Arc::clone(&desc)).unwrap();

        // ten cubes marching along +x; the frustum spans [-5, 35], so the
        // four at x = 0, 10, 20, 30 survive
        for i in 0..10 {
            let x = i as f32 * 10.0;
            spawn_cube(&system, &desc, x, vec![pack_sort_key(1, i as u16), pack_sort_key(1, i as u16)]);
        }
        assert_eq!(system.object_count(), 10);

        let device = Arc::new(RecordingDevice::new());
        let layer = run_frame(&mut system, device.clone());

        // 4 visible cubes x 2 primitives each
        assert_eq!(layer.primitive_count(), 8);
        let keys = layer.sort_keys();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted, "layer primitives must be ordered by sort key");

        // one context per layer job, one draw per primitive
        assert_eq!(device.submission_count(), 1);
        assert_eq!(device.total_draws(), 8);
    }

    #[test]
    fn test_consecutive_frames_are_deterministic() {
        let mut system = SceneSystem::new(test_config()).unwrap();
        let desc: Arc<dyn SceneObjectDesc> = CubeDesc::new();
        system.register_object_type("Cube", Arc::clone(&desc)).unwrap();

        // interleaved priorities so sorting has real work to do
        for i in 0..6 {
            let priority = (13 * (i + 1) % 5) as u16;
            spawn_cube(
                &system,
                &desc,
                i as f32,
                vec![pack_sort_key(priority, i as u16), pack_sort_key(priority, 100 + i as u16)],
            );
        }

        let first = run_frame(&mut system, Arc::new(NullDevice::new()));
        let second = run_frame(&mut system, Arc::new(NullDevice::new()));

        let ordering = |layer: &Arc<SceneLayer>| {
            layer
                .primitives()
                .iter()
                .map(|p| (p.sort_key, p.object))
                .collect::<Vec<_>>()
        };
        assert_eq!(ordering(&first), ordering(&second));
    }

    #[test]
    fn test_resume_protocol_matches_unbounded_generation() {
        // tiny buffer forces repeated partial generate calls on one object
        let constrained = SceneSystemConfig {
            worker_threads: 1,
            layer_buffer_capacity: 4,
            ..Default::default()
        };
        let mut system = SceneSystem::new(constrained).unwrap();
        let desc: Arc<dyn SceneObjectDesc> = CubeDesc::new();
        system.register_object_type("Cube", Arc::clone(&desc)).unwrap();

        let keys: Vec<u32> = (0..10).map(|i| pack_sort_key(2, i)).collect();
        spawn_cube(&system, &desc, 0.0, keys.clone());

        let layer = run_frame(&mut system, Arc::new(NullDevice::new()));

        let mut expected = keys;
        expected.sort_unstable();
        assert_eq!(layer.sort_keys(), expected);
    }

    #[test]
    fn test_overflow_drop_policy_keeps_what_fits() {
        let config = SceneSystemConfig {
            worker_threads: 1,
            layer_buffer_capacity: 4,
            overflow_policy: crate::core::config::OverflowPolicy::Drop,
            ..Default::default()
        };
        let mut system = SceneSystem::new(config).unwrap();
        let desc: Arc<dyn SceneObjectDesc> = CubeDesc::new();
        system.register_object_type("Cube", Arc::clone(&desc)).unwrap();

        spawn_cube(&system, &desc, 0.0, (0..10).map(|i| pack_sort_key(2, i)).collect());

        let layer = run_frame(&mut system, Arc::new(NullDevice::new()));
        assert_eq!(layer.primitive_count(), 4);
    }

    #[test]
    fn test_equal_keys_preserve_generation_order() {
        let mut system = SceneSystem::new(test_config()).unwrap();
        let desc: Arc<dyn SceneObjectDesc> = CubeDesc::new();
        system.register_object_type("Cube", Arc::clone(&desc)).unwrap();

        let same_key = pack_sort_key(3, 3);
        let first = spawn_cube(&system, &desc, 0.0, vec![same_key, same_key]);
        let second = spawn_cube(&system, &desc, 1.0, vec![same_key, same_key]);

        let layer = run_frame(&mut system, Arc::new(NullDevice::new()));

        let objects: Vec<SceneObjectKey> =
            layer.primitives().iter().map(|p| p.object).collect();
        assert_eq!(objects, vec![first, first, second, second]);
    }

    #[test]
    fn test_layers_of_different_views_stay_isolated() {
        let mut system = SceneSystem::new(test_config()).unwrap();
        let desc: Arc<dyn SceneObjectDesc> = CubeDesc::new();
        system.register_object_type("Cube", Arc::clone(&desc)).unwrap();

        // left cube only visible to the left view, right cube to the right
        let left_cube = spawn_cube(&system, &desc, -50.0, vec![pack_sort_key(1, 1)]);
        let right_cube = spawn_cube(&system, &desc, 50.0, vec![pack_sort_key(1, 2)]);

        let left_frustum = Frustum::from_view_projection(&Mat4::new_orthographic(
            -60.0, -40.0, -10.0, 10.0, -10.0, 10.0,
        ));
        let right_frustum = Frustum::from_view_projection(&Mat4::new_orthographic(
            40.0, 60.0, -10.0, 10.0, -10.0, 10.0,
        ));

        let device: Arc<dyn RenderDevice> = Arc::new(NullDevice::new());
        system.begin_rendering_views(device);

        let mut layers = Vec::new();
        for frustum in [left_frustum, right_frustum] {
            let view = system.add_view(frustum);
            for _ in 0..2 {
                layers.push(view.add_render_layer(
                    RenderViewport::new(0, 0, 64, 64),
                    MaterialDrawMode::Regular,
                ));
            }
        }
        system.finish_rendering_views();
        system.wait_for_rendering_to_complete();

        for (index, layer) in layers.iter().enumerate() {
            let expected = if index < 2 { left_cube } else { right_cube };
            let objects: Vec<SceneObjectKey> =
                layer.primitives().iter().map(|p| p.object).collect();
            assert_eq!(objects, vec![expected], "layer {index} saw foreign primitives");
        }
    }

    #[test]
    fn test_procedural_layer_bypasses_generation() {
        let mut system = SceneSystem::new(test_config()).unwrap();
        let desc: Arc<dyn SceneObjectDesc> = CubeDesc::new();
        system.register_object_type("Cube", Arc::clone(&desc)).unwrap();
        spawn_cube(&system, &desc, 0.0, vec![pack_sort_key(1, 1)]);

        let device = Arc::new(RecordingDevice::new());
        system.begin_rendering_views(device.clone());
        let view = system.add_view(test_frustum());
        let layer = view.add_procedural_layer(RenderViewport::new(0, 0, 64, 64), |_, ctx, _| {
            ctx.draw(&Mat4::identity(), 3);
        });
        system.finish_rendering_views();
        system.wait_for_rendering_to_complete();

        // the procedural function drew; the accumulation pipeline did not run
        assert_eq!(layer.primitive_count(), 0);
        let streams = device.submissions();
        assert_eq!(streams.len(), 1);
        assert!(streams[0]
            .iter()
            .any(|command| matches!(command, RenderCommand::Draw { vertex_count: 3, .. })));
    }

    #[test]
    fn test_dynamic_view_renders_with_frame() {
        let mut system = SceneSystem::new(test_config()).unwrap();
        let desc: Arc<dyn SceneObjectDesc> = CubeDesc::new();
        system.register_object_type("Cube", Arc::clone(&desc)).unwrap();
        spawn_cube(&system, &desc, 0.0, vec![pack_sort_key(1, 1)]);

        system.begin_rendering_views(Arc::new(NullDevice::new()));
        let _static_view = system.add_view(test_frustum());
        system.finish_rendering_views();

        let probe = system.add_dynamic_view(test_frustum());
        let probe_layer = probe
            .add_render_layer(RenderViewport::new(0, 0, 32, 32), MaterialDrawMode::Regular);
        system.begin_rendering_dynamic_view(&probe);

        system.wait_for_rendering_to_complete();
        assert_eq!(probe_layer.primitive_count(), 1);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "while a frame is rendering")]
    fn test_mutation_during_frame_asserts() {
        let mut system = SceneSystem::new(test_config()).unwrap();
        let desc: Arc<dyn SceneObjectDesc> = CubeDesc::new();
        system.register_object_type("Cube", Arc::clone(&desc)).unwrap();

        system.begin_rendering_views(Arc::new(NullDevice::new()));
        system.finish_rendering_views();
        // frame in flight: creating objects is a contract violation
        let _ = system.create_object(&desc, SceneObjectFlags::DRAW_REGULAR);
    }

    // -- particle boundary --------------------------------------------------

    struct StubCollection {
        name: String,
    }

    impl ParticleCollection for StubCollection {
        fn system_name(&self) -> &str {
            &self.name
        }

        fn particle_count(&self) -> usize {
            16
        }
    }

    struct StubParticleManager {
        particle_desc: Arc<dyn SceneObjectDesc>,
        monitor_desc: Arc<dyn SceneObjectDesc>,
    }

    struct InertDesc;

    impl SceneObjectDesc for InertDesc {
        fn create_state(&self) -> ObjectState {
            Box::new(())
        }
    }

    impl StubParticleManager {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                particle_desc: Arc::new(InertDesc),
                monitor_desc: Arc::new(InertDesc),
            })
        }
    }

    impl ParticleSystemManager for StubParticleManager {
        fn create_collection(
            &self,
            system_name: &str,
            _delay: f32,
            _random_seed: i32,
        ) -> Option<Box<dyn ParticleCollection>> {
            (system_name == "sparks").then(|| {
                Box::new(StubCollection {
                    name: system_name.to_string(),
                }) as Box<dyn ParticleCollection>
            })
        }

        fn read_config_file(
            &self,
            path: &Path,
            _precache: bool,
            _decommit_temp_memory: bool,
        ) -> bool {
            path.ends_with("particles.cfg")
        }

        fn particle_object_desc(&self) -> Arc<dyn SceneObjectDesc> {
            Arc::clone(&self.particle_desc)
        }

        fn monitor_object_desc(&self) -> Arc<dyn SceneObjectDesc> {
            Arc::clone(&self.monitor_desc)
        }
    }

    #[test]
    fn test_particle_object_creation() {
        let system =
            SceneSystem::with_particles(test_config(), StubParticleManager::new()).unwrap();

        let key = system.create_particle_object("sparks", 0.0, 42).unwrap();
        assert_eq!(system.object_count(), 1);

        let (name, count) = system
            .with_object(key, |object| {
                let collection = object.state::<Box<dyn ParticleCollection>>().unwrap();
                (collection.system_name().to_string(), collection.particle_count())
            })
            .unwrap();
        assert_eq!(name, "sparks");
        assert_eq!(count, 16);
    }

    #[test]
    fn test_unknown_particle_system() {
        let system =
            SceneSystem::with_particles(test_config(), StubParticleManager::new()).unwrap();
        assert!(matches!(
            system.create_particle_object("smoke", 0.0, 0),
            Err(SceneError::NotFound(_))
        ));
    }

    #[test]
    fn test_particle_calls_without_manager() {
        let system = SceneSystem::new(test_config()).unwrap();

        assert!(matches!(
            system.create_particle_object("sparks", 0.0, 0),
            Err(SceneError::ParticlesUnavailable)
        ));
        assert!(matches!(
            system.create_monitor_object(),
            Err(SceneError::ParticlesUnavailable)
        ));
        assert!(!system.read_particle_config_file(Path::new("particles.cfg"), true, true));
    }

    #[test]
    fn test_particle_config_pass_through() {
        let system =
            SceneSystem::with_particles(test_config(), StubParticleManager::new()).unwrap();

        assert!(system.read_particle_config_file(Path::new("particles.cfg"), true, true));
        assert!(!system.read_particle_config_file(Path::new("other.cfg"), true, true));
    }

    #[test]
    fn test_monitor_object_creation() {
        let system =
            SceneSystem::with_particles(test_config(), StubParticleManager::new()).unwrap();
        let key = system.create_monitor_object().unwrap();
        assert!(system.with_object(key, |_| ()).is_some());
    }

    #[test]
    fn test_particle_types_are_registered() {
        let system =
            SceneSystem::with_particles(test_config(), StubParticleManager::new()).unwrap();
        assert!(system.object_type_desc(PARTICLE_OBJECT_TYPE).is_ok());
        assert!(system.object_type_desc(MONITOR_OBJECT_TYPE).is_ok());
    }
}
