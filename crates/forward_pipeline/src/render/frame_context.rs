//! Frame context abstraction
//!
//! The frame context is the host's submission target for one frame. The
//! pipeline never encodes GPU work itself; it drives the frame through this
//! trait and the host performs culling, pass resolution and encoding.
//!
//! None of the operations return errors. Device loss and similar failures
//! belong to the host and are surfaced by it, outside the pipeline.

use std::ops::{Deref, DerefMut};

use crate::render::{Color, CommandBuffer, DrawingSettings, FilteringSettings, Viewpoint};
use crate::scene::VisibilityResult;

/// Capabilities the pipeline consumes from the host each frame
pub trait FrameContext {
    /// Replay a recorded command buffer
    fn execute_command_buffer(&mut self, buffer: &CommandBuffer);

    /// Bind view/projection globals for `viewpoint`
    fn setup_viewpoint_state(&mut self, viewpoint: &Viewpoint);

    /// Visible drawables and lights for `viewpoint`
    ///
    /// Must return an empty result for a viewpoint without a valid frustum.
    fn query_visibility(&mut self, viewpoint: &Viewpoint) -> VisibilityResult;

    /// Draw the drawables of `visibility` accepted by the settings
    fn draw_filtered(
        &mut self,
        visibility: &VisibilityResult,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
    );

    /// Draw the full-screen background for `viewpoint`
    fn draw_background(&mut self, viewpoint: &Viewpoint);

    /// Submit everything issued this frame
    fn submit(&mut self);

    /// Emit editor-only world geometry for a scene-view viewpoint
    fn emit_scene_view_geometry(&mut self, _viewpoint: &Viewpoint) {}

    /// Clear the current render target
    ///
    /// The default records the clear into `buffer`, together with anything
    /// already pending there, executes it and empties it.
    fn clear(&mut self, buffer: &mut CommandBuffer, clear_depth: bool, clear_color: bool, color: Color) {
        buffer.clear_render_target(clear_depth, clear_color, color);
        self.execute_command_buffer(buffer);
        buffer.clear();
    }

    /// Open a named profiling sample
    fn begin_sample(&mut self, buffer: &mut CommandBuffer, name: &str) {
        buffer.begin_sample(name);
        self.execute_command_buffer(buffer);
        buffer.clear();
    }

    /// Close a named profiling sample
    fn end_sample(&mut self, buffer: &mut CommandBuffer, name: &str) {
        buffer.end_sample(name);
        self.execute_command_buffer(buffer);
        buffer.clear();
    }
}

/// Named profiling sample held open for the guard's lifetime
///
/// Opens the sample through [`FrameContext::begin_sample`] and closes it
/// through [`FrameContext::end_sample`] when the guard drops, including
/// during unwinding. The frame context is reachable through the guard for
/// the duration of the sample.
pub struct ProfilingScope<'a, C: FrameContext + ?Sized> {
    context: &'a mut C,
    buffer: &'a mut CommandBuffer,
    label: &'a str,
}

impl<'a, C: FrameContext + ?Sized> ProfilingScope<'a, C> {
    /// Open the sample
    pub fn begin(context: &'a mut C, buffer: &'a mut CommandBuffer, label: &'a str) -> Self {
        context.begin_sample(buffer, label);
        Self { context, buffer, label }
    }

    /// Sample label
    pub fn label(&self) -> &str {
        self.label
    }
}

impl<C: FrameContext + ?Sized> Deref for ProfilingScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.context
    }
}

impl<C: FrameContext + ?Sized> DerefMut for ProfilingScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.context
    }
}

impl<C: FrameContext + ?Sized> Drop for ProfilingScope<'_, C> {
    fn drop(&mut self) {
        self.context.end_sample(self.buffer, self.label);
    }
}
