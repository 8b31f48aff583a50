//! Recording frame context
//!
//! [`TraceContext`] implements [`FrameContext`] on top of a [`Scene`] and
//! records every call as a [`FrameEvent`] instead of encoding GPU work. It
//! is the frame context used by the pipeline tests and the `frame_trace`
//! tool.

use std::fmt;

use crate::render::{
    build_draw_list, Color, Command, CommandBuffer, DrawingSettings, FilteringSettings, FrameContext,
    ShaderTagId, Viewpoint,
};
use crate::scene::{DrawableId, Scene, VisibilityResult};

/// A draw issued through the frame context
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    /// Drawable drawn
    pub drawable: DrawableId,
    /// Name of the bound material
    pub material: String,
    /// Shader pass executed
    pub pass: Option<ShaderTagId>,
    /// Render queue of the drawable's own material
    pub render_queue: i32,
    /// View-space depth used for ordering
    pub depth: f32,
}

/// One recorded frame-context call
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    /// Render target cleared
    Clear {
        /// Depth cleared
        depth: bool,
        /// Color cleared
        color: bool,
        /// Clear color
        value: Color,
    },
    /// Profiling sample opened
    BeginSample(String),
    /// Profiling sample closed
    EndSample(String),
    /// View globals bound for the named viewpoint
    SetupViewpoint(String),
    /// Scene-view geometry emitted for the named viewpoint
    SceneViewGeometry(String),
    /// Visibility queried for the named viewpoint
    Cull {
        /// Viewpoint name
        viewpoint: String,
        /// Number of visible drawables
        drawables: usize,
    },
    /// Drawable drawn
    Draw(DrawRecord),
    /// Background drawn for the named viewpoint
    Background(String),
    /// Frame submitted
    Submit,
}

impl fmt::Display for FrameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear { depth, color, value } => write!(
                f,
                "clear depth={depth} color={color} rgba=({:.2}, {:.2}, {:.2}, {:.2})",
                value.r, value.g, value.b, value.a
            ),
            Self::BeginSample(name) => write!(f, "begin sample '{name}'"),
            Self::EndSample(name) => write!(f, "end sample '{name}'"),
            Self::SetupViewpoint(name) => write!(f, "setup viewpoint '{name}'"),
            Self::SceneViewGeometry(name) => write!(f, "scene view geometry '{name}'"),
            Self::Cull { viewpoint, drawables } => write!(f, "cull '{viewpoint}': {drawables} visible"),
            Self::Draw(record) => {
                let pass = record.pass.as_ref().map_or("<override>", ShaderTagId::name);
                write!(
                    f,
                    "draw {:?} material='{}' pass={} queue={} depth={:.2}",
                    record.drawable, record.material, pass, record.render_queue, record.depth
                )
            }
            Self::Background(name) => write!(f, "background '{name}'"),
            Self::Submit => f.write_str("submit"),
        }
    }
}

/// Frame context that records calls against a scene
#[derive(Debug)]
pub struct TraceContext<'s> {
    scene: &'s Scene,
    events: Vec<FrameEvent>,
}

impl<'s> TraceContext<'s> {
    /// Record frames rendered from `scene`
    pub fn new(scene: &'s Scene) -> Self {
        Self {
            scene,
            events: Vec::new(),
        }
    }

    /// Recorded events in call order
    pub fn events(&self) -> &[FrameEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the trace empty
    pub fn take_events(&mut self) -> Vec<FrameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recorded draws in call order
    pub fn draws(&self) -> impl Iterator<Item = &DrawRecord> {
        self.events.iter().filter_map(|event| match event {
            FrameEvent::Draw(record) => Some(record),
            _ => None,
        })
    }

    /// Number of recorded draws
    pub fn draw_count(&self) -> usize {
        self.draws().count()
    }
}

impl FrameContext for TraceContext<'_> {
    fn execute_command_buffer(&mut self, buffer: &CommandBuffer) {
        self.events.extend(buffer.commands().iter().map(|command| match command {
            Command::ClearRenderTarget { clear_depth, clear_color, color } => FrameEvent::Clear {
                depth: *clear_depth,
                color: *clear_color,
                value: *color,
            },
            Command::BeginSample(name) => FrameEvent::BeginSample(name.clone()),
            Command::EndSample(name) => FrameEvent::EndSample(name.clone()),
        }));
    }

    fn setup_viewpoint_state(&mut self, viewpoint: &Viewpoint) {
        self.events.push(FrameEvent::SetupViewpoint(viewpoint.name.clone()));
    }

    fn query_visibility(&mut self, viewpoint: &Viewpoint) -> VisibilityResult {
        let visibility = self.scene.cull(viewpoint);
        self.events.push(FrameEvent::Cull {
            viewpoint: viewpoint.name.clone(),
            drawables: visibility.drawables().len(),
        });
        visibility
    }

    fn draw_filtered(
        &mut self,
        visibility: &VisibilityResult,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
    ) {
        for call in build_draw_list(visibility, drawing, filtering) {
            let render_queue = self
                .scene
                .drawable(call.drawable)
                .map_or(call.material.render_queue, |drawable| drawable.material.render_queue);

            self.events.push(FrameEvent::Draw(DrawRecord {
                drawable: call.drawable,
                material: call.material.name.clone(),
                pass: call.pass,
                render_queue,
                depth: call.key.depth,
            }));
        }
    }

    fn draw_background(&mut self, viewpoint: &Viewpoint) {
        self.events.push(FrameEvent::Background(viewpoint.name.clone()));
    }

    fn emit_scene_view_geometry(&mut self, viewpoint: &Viewpoint) {
        self.events.push(FrameEvent::SceneViewGeometry(viewpoint.name.clone()));
    }

    fn submit(&mut self) {
        self.events.push(FrameEvent::Submit);
    }
}
