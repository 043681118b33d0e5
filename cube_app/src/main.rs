//! Cube field demo
//!
//! Drives the scene pipeline end to end without a GPU: a grid of spinning
//! cubes is culled, turned into sorted draw primitives, and submitted to a
//! recording render device. Each frame logs what the pipeline produced, so
//! the demo doubles as a quick sanity check of culling and batching.

use std::error::Error;
use std::sync::Arc;

use scene_engine::foundation::logging;
use scene_engine::foundation::math::Point3;
use scene_engine::prelude::*;
use scene_engine::render::{InputLayoutId, RecordingDevice, ShaderId, TextureId};
use scene_engine::scene::{depth_bucket, pack_sort_key, ObjectState};

const GRID_SIZE: i32 = 8;
const GRID_SPACING: f32 = 4.0;
const CUBE_VERTEX_COUNT: u32 = 36;

/// Object type for the demo cubes
struct CubeDesc {
    material: Material,
    draw_op: Arc<MaterialDrawDescriptor>,
}

struct CubeState {
    spin_speed: f32,
}

impl CubeDesc {
    fn new() -> Arc<Self> {
        let descriptor = MaterialDrawDescriptor {
            texture: TextureId(1),
            vertex_shader: ShaderId(10),
            pixel_shader: ShaderId(11),
        };
        Arc::new(Self {
            material: Material::uniform(
                descriptor,
                InputLayoutId(0),
                SceneObjectFlags::DRAW_REGULAR,
            ),
            draw_op: Arc::new(descriptor),
        })
    }
}

impl SceneObjectDesc for CubeDesc {
    fn create_state(&self) -> ObjectState {
        Box::new(CubeState { spin_speed: 1.0 })
    }

    fn generate_primitives(
        &self,
        object: &SceneObject,
        start: usize,
        _max: usize,
        out: &mut Vec<DrawPrimitive>,
        _view: &SceneView,
        _layer: &SceneLayer,
    ) -> usize {
        // one primitive per cube
        if start > 0 {
            return 0;
        }

        let depth = object.transform()[(2, 3)].abs();
        out.push(DrawPrimitive {
            sort_key: pack_sort_key(1, depth_bucket(depth, 0.1, 200.0)),
            transform: *object.transform(),
            draw_op: Arc::clone(&self.draw_op),
            object: object.key(),
        });
        1
    }

    fn draw_array(
        &self,
        ctx: &mut dyn RenderContext,
        primitives: &[DrawPrimitive],
        _view: &SceneView,
        _layer: &SceneLayer,
    ) {
        // one bind for the whole sorted run, then a draw per cube
        self.material.bind(ctx, MaterialDrawMode::Regular);
        for primitive in primitives {
            ctx.draw(&primitive.transform, CUBE_VERTEX_COUNT);
        }
    }
}

fn spin_transform(x: f32, z: f32, angle: f32) -> Mat4 {
    let rotation = Mat4::new_rotation(Vec3::new(0.0, angle, 0.0));
    Mat4::new_translation(&Vec3::new(x, 0.0, z)) * rotation
}

fn camera_frustum(aspect: f32) -> Frustum {
    let projection = Mat4::new_perspective(aspect, std::f32::consts::FRAC_PI_3, 0.1, 200.0);
    let view = Mat4::look_at_rh(
        &Point3::new(0.0, 20.0, 40.0),
        &Point3::origin(),
        &Vec3::new(0.0, 1.0, 0.0),
    );
    Frustum::from_view_projection(&(projection * view))
}

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();
    log::info!("cube demo starting");

    let mut scene = SceneSystem::new(SceneSystemConfig::default())?;

    let cube_desc = CubeDesc::new();
    let desc: Arc<dyn SceneObjectDesc> = cube_desc;
    scene.register_object_type("cube", Arc::clone(&desc))?;

    // grid of cubes centered on the origin
    let mut cubes = Vec::new();
    for ix in 0..GRID_SIZE {
        for iz in 0..GRID_SIZE {
            let x = (ix - GRID_SIZE / 2) as f32 * GRID_SPACING;
            let z = (iz - GRID_SIZE / 2) as f32 * GRID_SPACING;

            let key = scene.create_object(&desc, SceneObjectFlags::DRAW_REGULAR)?;
            scene.set_object_bounds(
                key,
                Vec3::new(x - 0.5, -0.5, z - 0.5),
                Vec3::new(x + 0.5, 0.5, z + 0.5),
            );
            scene.set_object_transform(key, spin_transform(x, z, 0.0));
            // outer cubes spin faster than the center ones
            scene.with_object_mut(key, |object| {
                let ring = (ix - GRID_SIZE / 2).abs() + (iz - GRID_SIZE / 2).abs();
                object.state_mut::<CubeState>().unwrap().spin_speed = 1.0 + ring as f32 * 0.25;
            });
            cubes.push((key, x, z));
        }
    }
    log::info!("created {} cubes", cubes.len());

    let viewport = RenderViewport::new(0, 0, 1280, 720);
    let device = Arc::new(RecordingDevice::new());

    for frame in 0..8u32 {
        for (key, x, z) in &cubes {
            let speed = scene
                .with_object(*key, |object| object.state::<CubeState>().unwrap().spin_speed)
                .unwrap_or(1.0);
            let angle = frame as f32 * 0.1 * speed;
            scene.set_object_transform(*key, spin_transform(*x, *z, angle));
        }

        device.clear();
        scene.begin_rendering_views(device.clone());
        let view = scene.add_view(camera_frustum(viewport.aspect_ratio()));
        let layer = view.add_render_layer(viewport, MaterialDrawMode::Regular);
        scene.finish_rendering_views();
        scene.wait_for_rendering_to_complete();

        log::info!(
            "frame {frame}: {} primitives, {} draws across {} submissions",
            layer.primitive_count(),
            device.total_draws(),
            device.submission_count()
        );
    }

    scene.shutdown();
    log::info!("cube demo done");
    Ok(())
}
