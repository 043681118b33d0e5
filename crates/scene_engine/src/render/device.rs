//! Render device and command context traits
//!
//! A [`RenderDevice`] is bound for the duration of one frame. Every layer
//! job asks it for a private [`RenderContext`], records commands into it,
//! and hands it back via [`RenderDevice::submit`]. Contexts are never shared
//! between jobs, so command recording needs no synchronization.
//!
//! [`NullDevice`] and [`RecordingDevice`] are the two in-tree
//! implementations: the first discards everything, the second captures the
//! command stream for tests and demo statistics.

use std::sync::{Arc, Mutex};

use super::{InputLayoutId, MaterialDrawDescriptor, RenderViewport};
use crate::foundation::math::Mat4;

/// Command recording surface handed to exactly one layer job
pub trait RenderContext: Send {
    /// Set the viewport subsequent draws render into
    fn set_viewport(&mut self, viewport: &RenderViewport);

    /// Bind material state for subsequent draws
    fn bind(&mut self, draw_op: &MaterialDrawDescriptor, layout: InputLayoutId);

    /// Issue one draw with the given world transform
    fn draw(&mut self, transform: &Mat4, vertex_count: u32);
}

/// Frame-scoped device that creates and collects command contexts
pub trait RenderDevice: Send + Sync {
    /// Create a fresh command context for one unit of concurrent work
    fn create_context(&self) -> Box<dyn RenderContext>;

    /// Accept a finished context for submission
    fn submit(&self, context: Box<dyn RenderContext>);
}

/// Device that discards every command
#[derive(Debug, Default)]
pub struct NullDevice;

impl NullDevice {
    /// Create a null device
    pub fn new() -> Self {
        Self
    }
}

struct NullContext;

impl RenderContext for NullContext {
    fn set_viewport(&mut self, _viewport: &RenderViewport) {}
    fn bind(&mut self, _draw_op: &MaterialDrawDescriptor, _layout: InputLayoutId) {}
    fn draw(&mut self, _transform: &Mat4, _vertex_count: u32) {}
}

impl RenderDevice for NullDevice {
    fn create_context(&self) -> Box<dyn RenderContext> {
        Box::new(NullContext)
    }

    fn submit(&self, _context: Box<dyn RenderContext>) {}
}

/// One recorded command, in recording order
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Viewport change
    SetViewport(RenderViewport),
    /// Material bind
    Bind {
        /// Bound draw descriptor
        draw_op: MaterialDrawDescriptor,
        /// Bound input layout
        layout: InputLayoutId,
    },
    /// Draw call
    Draw {
        /// World transform of the draw
        transform: Mat4,
        /// Vertex count of the draw
        vertex_count: u32,
    },
}

/// Device that records every submitted command stream
///
/// Each context records privately; `submit` appends the context's stream to
/// the shared submission list, so the list has one entry per layer job.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    submissions: Arc<Mutex<Vec<Vec<RenderCommand>>>>,
}

impl RecordingDevice {
    /// Create an empty recording device
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contexts submitted so far
    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    /// Snapshot of all submitted command streams
    pub fn submissions(&self) -> Vec<Vec<RenderCommand>> {
        self.submissions.lock().unwrap().clone()
    }

    /// Total draw calls across all submissions
    pub fn total_draws(&self) -> usize {
        self.submissions
            .lock()
            .unwrap()
            .iter()
            .flatten()
            .filter(|command| matches!(command, RenderCommand::Draw { .. }))
            .count()
    }

    /// Drop all recorded submissions
    pub fn clear(&self) {
        self.submissions.lock().unwrap().clear();
    }
}

struct RecordingContext {
    commands: Vec<RenderCommand>,
    submissions: Arc<Mutex<Vec<Vec<RenderCommand>>>>,
}

impl RenderContext for RecordingContext {
    fn set_viewport(&mut self, viewport: &RenderViewport) {
        self.commands.push(RenderCommand::SetViewport(*viewport));
    }

    fn bind(&mut self, draw_op: &MaterialDrawDescriptor, layout: InputLayoutId) {
        self.commands.push(RenderCommand::Bind {
            draw_op: *draw_op,
            layout,
        });
    }

    fn draw(&mut self, transform: &Mat4, vertex_count: u32) {
        self.commands.push(RenderCommand::Draw {
            transform: *transform,
            vertex_count,
        });
    }
}

impl RenderDevice for RecordingDevice {
    fn create_context(&self) -> Box<dyn RenderContext> {
        Box::new(RecordingContext {
            commands: Vec::new(),
            submissions: Arc::clone(&self.submissions),
        })
    }

    fn submit(&self, context: Box<dyn RenderContext>) {
        // submit consumes the trait object; the recording context pushes its
        // stream on drop instead of exposing a downcast surface
        drop(context);
    }
}

impl Drop for RecordingContext {
    fn drop(&mut self) {
        let commands = std::mem::take(&mut self.commands);
        self.submissions.lock().unwrap().push(commands);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ShaderId, TextureId};

    #[test]
    fn test_recording_device_captures_streams() {
        let device = RecordingDevice::new();

        let mut ctx = device.create_context();
        ctx.set_viewport(&RenderViewport::new(0, 0, 64, 64));
        ctx.bind(
            &MaterialDrawDescriptor {
                texture: TextureId(1),
                vertex_shader: ShaderId(2),
                pixel_shader: ShaderId(3),
            },
            InputLayoutId(0),
        );
        ctx.draw(&Mat4::identity(), 36);
        device.submit(ctx);

        assert_eq!(device.submission_count(), 1);
        assert_eq!(device.total_draws(), 1);

        let streams = device.submissions();
        assert!(matches!(streams[0][0], RenderCommand::SetViewport(_)));
        assert!(matches!(streams[0][2], RenderCommand::Draw { vertex_count: 36, .. }));
    }

    #[test]
    fn test_contexts_record_independently() {
        let device = RecordingDevice::new();

        let mut first = device.create_context();
        let mut second = device.create_context();
        first.draw(&Mat4::identity(), 3);
        second.draw(&Mat4::identity(), 6);
        device.submit(second);
        device.submit(first);

        let streams = device.submissions();
        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].len(), 1);
        assert_eq!(streams[1].len(), 1);
    }
}
