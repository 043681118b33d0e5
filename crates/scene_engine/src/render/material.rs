//! Material draw modes and per-mode draw descriptors
//!
//! Materials here are deliberately shallow: a handful of opaque handles the
//! core threads through to whatever sits behind the render device. The one
//! piece of real policy is [`MaterialDrawMode`], which selects the per-mode
//! descriptor and maps onto the scene-object pass flags used for layer
//! filtering.

use crate::scene::SceneObjectFlags;

/// Rendering pass variant a material can be drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialDrawMode {
    /// Full forward rendering
    Regular,
    /// Geometry output into a gbuffer
    LightPrepass,
    /// Second deferred pass
    LightPostpass,
}

impl MaterialDrawMode {
    /// Number of draw modes
    pub const COUNT: usize = 3;

    /// Index into per-mode descriptor arrays
    pub fn index(self) -> usize {
        match self {
            Self::Regular => 0,
            Self::LightPrepass => 1,
            Self::LightPostpass => 2,
        }
    }

    /// The object pass flag a standard layer of this mode filters on
    pub fn pass_flag(self) -> SceneObjectFlags {
        match self {
            Self::Regular => SceneObjectFlags::DRAW_REGULAR,
            Self::LightPrepass => SceneObjectFlags::DRAW_LIGHT_PREPASS,
            Self::LightPostpass => SceneObjectFlags::DRAW_LIGHT_POSTPASS,
        }
    }
}

/// Opaque handle to a compiled shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

/// Opaque handle to a texture resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Opaque handle to a vertex input layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputLayoutId(pub u32);

/// Bind state for one material in one draw mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialDrawDescriptor {
    /// Texture bound while drawing
    pub texture: TextureId,
    /// Vertex shader for this mode
    pub vertex_shader: ShaderId,
    /// Pixel shader for this mode
    pub pixel_shader: ShaderId,
}

/// A material: one draw descriptor per mode, an input layout, and the mask
/// of passes the material participates in
#[derive(Debug, Clone)]
pub struct Material {
    /// Per-mode bind state, indexed by [`MaterialDrawMode::index`]
    pub draw_descriptors: [MaterialDrawDescriptor; MaterialDrawMode::COUNT],
    /// Vertex input layout shared by every mode
    pub input_layout: InputLayoutId,
    /// Which scene-object passes this material renders in
    pub pass_flags: SceneObjectFlags,
}

impl Material {
    /// Create a material that uses the same bind state in every mode
    pub fn uniform(
        descriptor: MaterialDrawDescriptor,
        input_layout: InputLayoutId,
        pass_flags: SceneObjectFlags,
    ) -> Self {
        Self {
            draw_descriptors: [descriptor; MaterialDrawMode::COUNT],
            input_layout,
            pass_flags,
        }
    }

    /// The bind state for one draw mode
    pub fn draw_descriptor(&self, mode: MaterialDrawMode) -> &MaterialDrawDescriptor {
        &self.draw_descriptors[mode.index()]
    }

    /// Bind this material on a command context for the given mode
    pub fn bind(&self, ctx: &mut dyn super::RenderContext, mode: MaterialDrawMode) {
        ctx.bind(self.draw_descriptor(mode), self.input_layout);
    }
}
