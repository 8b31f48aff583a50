//! # Rendering System
//!
//! The forward pipeline and everything it exchanges with the host.
//!
//! ## Architecture
//!
//! ```text
//! ForwardPipeline (driver: viewpoints in order, one submit)
//!      ↓
//! ViewRenderer (clear → cull → opaque → background → transparent → fallback)
//!      ↓
//! FrameContext (host: culling, draw encoding, submission)
//! ```
//!
//! Sorting and filtering of draws lives in [`render_queue`]; hosts call
//! [`build_draw_list`] from their `draw_filtered` implementation.

mod color;
mod command_buffer;
mod frame_context;
mod material;
mod pipeline;
pub mod render_queue;
mod trace;
mod view_renderer;
mod viewpoint;

#[cfg(test)]
mod pipeline_tests;

pub use color::Color;
pub use command_buffer::{Command, CommandBuffer};
pub use frame_context::{FrameContext, ProfilingScope};
pub use material::{
    error_material, queue, Material, MaterialId, RenderQueueRange, ShaderTagId, ERROR_SHADER_NAME,
    LEGACY_SHADER_TAGS,
};
pub use pipeline::{ForwardPipeline, FrameStats, PipelineAsset};
pub use render_queue::{
    build_draw_list, DrawCall, DrawingSettings, FilteringSettings, PassSelection, SortKey, SortingCriteria,
};
pub use trace::{DrawRecord, FrameEvent, TraceContext};
pub use view_renderer::ViewRenderer;
pub use viewpoint::{ClearFlags, CullingParameters, Viewpoint, ViewpointKind};

use crate::config::ConfigError;

/// Pipeline creation errors
///
/// Rendering itself never fails; these are raised only while turning
/// settings or asset files into a pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Settings failed validation
    #[error("Invalid pipeline settings: {0}")]
    InvalidSettings(String),

    /// A queue range has its bounds reversed
    #[error("Invalid render queue range {0}")]
    InvalidQueueRange(RenderQueueRange),

    /// The opaque range does not lie entirely below the transparent range
    #[error("Opaque queue range {opaque} must lie below transparent range {transparent}")]
    OverlappingQueueRanges {
        /// Configured opaque range
        opaque: RenderQueueRange,
        /// Configured transparent range
        transparent: RenderQueueRange,
    },

    /// Loading the pipeline asset failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
