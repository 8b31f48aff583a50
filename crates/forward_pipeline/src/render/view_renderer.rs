//! Per-view renderer
//!
//! Renders one viewpoint as a fixed sequence of frame-context calls:
//!
//! ```text
//! clear + begin sample
//!   setup viewpoint state
//!   visibility query
//!   opaque pass       (front-to-back)
//!   background
//!   transparent pass  (back-to-front)
//!   fallback pass     (development builds only)
//! end sample
//! ```

use crate::core::{BuildMode, PipelineSettings};
use crate::render::{
    error_material, CommandBuffer, DrawingSettings, FilteringSettings, FrameContext, PassSelection,
    ProfilingScope, RenderQueueRange, SortingCriteria, Viewpoint, ViewpointKind,
};
use crate::scene::VisibilityResult;

/// Renders a single viewpoint into a frame context
#[derive(Debug)]
pub struct ViewRenderer {
    command_buffer: CommandBuffer,
    profiling_label: String,
    build_mode: BuildMode,
    opaque_drawing: DrawingSettings,
    opaque_filtering: FilteringSettings,
    transparent_drawing: DrawingSettings,
    transparent_filtering: FilteringSettings,
    fallback_drawing: Option<DrawingSettings>,
}

impl ViewRenderer {
    /// Create a renderer from validated settings
    pub fn new(settings: &PipelineSettings) -> Self {
        Self {
            command_buffer: CommandBuffer::new(settings.command_buffer_name.clone()),
            profiling_label: settings.profiling_label.clone(),
            build_mode: settings.build_mode,
            opaque_drawing: DrawingSettings::new(settings.shader_tags.clone(), SortingCriteria::CommonOpaque),
            opaque_filtering: FilteringSettings::new(settings.opaque_range),
            transparent_drawing: DrawingSettings::new(
                settings.shader_tags.clone(),
                SortingCriteria::CommonTransparent,
            ),
            transparent_filtering: FilteringSettings::new(settings.transparent_range),
            fallback_drawing: None,
        }
    }

    /// Render `viewpoint` into `ctx`
    ///
    /// Never fails: a viewpoint without a valid frustum is cleared and gets
    /// its background, but draws nothing else.
    pub fn render_view<C: FrameContext + ?Sized>(&mut self, ctx: &mut C, viewpoint: &Viewpoint) {
        log::trace!("Rendering viewpoint '{}'", viewpoint.name);

        let Self {
            command_buffer,
            profiling_label,
            build_mode,
            opaque_drawing,
            opaque_filtering,
            transparent_drawing,
            transparent_filtering,
            fallback_drawing,
        } = self;

        ctx.clear(
            command_buffer,
            viewpoint.clear_depth(),
            viewpoint.clear_color(),
            viewpoint.background_color,
        );
        let mut scope = ProfilingScope::begin(ctx, command_buffer, profiling_label);

        scope.setup_viewpoint_state(viewpoint);

        if viewpoint.kind == ViewpointKind::SceneView {
            scope.emit_scene_view_geometry(viewpoint);
        }

        let visibility = if viewpoint.has_valid_frustum() {
            scope.query_visibility(viewpoint)
        } else {
            log::warn!(
                "Viewpoint '{}' has no valid frustum (near {}, far {}); skipping culling",
                viewpoint.name,
                viewpoint.near,
                viewpoint.far
            );
            VisibilityResult::empty()
        };
        log::debug!(
            "Viewpoint '{}': {} drawables, {} lights visible",
            viewpoint.name,
            visibility.drawables().len(),
            visibility.lights().len()
        );

        scope.draw_filtered(&visibility, opaque_drawing, opaque_filtering);
        scope.draw_background(viewpoint);
        scope.draw_filtered(&visibility, transparent_drawing, transparent_filtering);

        if build_mode.is_development() {
            let fallback = fallback_drawing.get_or_insert_with(|| {
                DrawingSettings::new(opaque_drawing.shader_tags.clone(), SortingCriteria::None)
                    .with_selection(PassSelection::Unsupported)
                    .with_override_material(error_material())
            });
            scope.draw_filtered(&visibility, fallback, &FilteringSettings::new(RenderQueueRange::ALL));
        }
    }
}
