//! Render device boundary
//!
//! The scene core never talks to a GPU directly. It consumes an opaque
//! [`RenderDevice`] at the start of a frame, hands each worker its own
//! [`RenderContext`] for command recording, and threads material
//! draw-descriptors through to the object descriptors that issue the actual
//! submissions. Everything GPU-shaped (resource binding, shader compilation)
//! lives on the far side of these traits.

mod device;
mod material;
mod viewport;

pub use device::{NullDevice, RecordingDevice, RenderCommand, RenderContext, RenderDevice};
pub use material::{
    InputLayoutId, Material, MaterialDrawDescriptor, MaterialDrawMode, ShaderId, TextureId,
};
pub use viewport::RenderViewport;
