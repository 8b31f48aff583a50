//! # Pipeline Configuration
//!
//! Serializable settings for the forward pipeline and for applications that
//! host it. Settings are validated once, when a pipeline is created from
//! them; rendering itself never re-checks them.
//!
//! ## Configuration Categories
//!
//! - **PipelineSettings**: build mode, shader tags, queue ranges, labels
//! - **ApplicationConfig**: logging plus the pipeline asset to instantiate

use serde::{Deserialize, Serialize};

use crate::foundation::logging::LoggingConfig;
use crate::render::{PipelineAsset, PipelineError, RenderQueueRange, ShaderTagId};

pub use crate::config::{Config, ConfigError};

/// Build flavor the pipeline runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildMode {
    /// Diagnostics enabled; unsupported materials are drawn with the error material
    Development,
    /// Unsupported materials are skipped
    Production,
}

impl BuildMode {
    /// Build mode matching how this crate was compiled
    pub const fn detect() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }

    /// Whether development-only passes run
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl Default for BuildMode {
    fn default() -> Self {
        Self::detect()
    }
}

/// # Pipeline Settings
///
/// Everything the forward pipeline needs to know about the host's shaders
/// and how it should label its work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Development or production behavior
    pub build_mode: BuildMode,
    /// Name of the profiling sample wrapping each viewpoint
    pub profiling_label: String,
    /// Name of the command buffer used for clears and sample markers
    pub command_buffer_name: String,
    /// Shader pass tags the pipeline draws, in priority order
    pub shader_tags: Vec<ShaderTagId>,
    /// Queue values drawn by the opaque pass
    pub opaque_range: RenderQueueRange,
    /// Queue values drawn by the transparent pass
    pub transparent_range: RenderQueueRange,
}

impl PipelineSettings {
    /// Create settings with defaults for the current build
    pub fn new() -> Self {
        Self {
            build_mode: BuildMode::detect(),
            profiling_label: "Render Camera".to_string(),
            command_buffer_name: "Render Commands".to_string(),
            shader_tags: vec![ShaderTagId::SRP_DEFAULT_UNLIT],
            opaque_range: RenderQueueRange::OPAQUE,
            transparent_range: RenderQueueRange::TRANSPARENT,
        }
    }

    /// Set the build mode
    pub fn with_build_mode(mut self, build_mode: BuildMode) -> Self {
        self.build_mode = build_mode;
        self
    }

    /// Set the profiling sample label
    pub fn with_profiling_label(mut self, label: impl Into<String>) -> Self {
        self.profiling_label = label.into();
        self
    }

    /// Replace the recognized shader pass tags
    pub fn with_shader_tags(mut self, tags: Vec<ShaderTagId>) -> Self {
        self.shader_tags = tags;
        self
    }

    /// Replace the opaque and transparent queue ranges
    pub fn with_queue_ranges(mut self, opaque: RenderQueueRange, transparent: RenderQueueRange) -> Self {
        self.opaque_range = opaque;
        self.transparent_range = transparent;
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.profiling_label.trim().is_empty() {
            return Err(PipelineError::InvalidSettings("Profiling label cannot be empty".to_string()));
        }

        if self.shader_tags.is_empty() {
            return Err(PipelineError::InvalidSettings(
                "At least one shader tag must be recognized".to_string(),
            ));
        }

        if let Some(tag) = self.shader_tags.iter().find(|tag| tag.name().is_empty()) {
            return Err(PipelineError::InvalidSettings(format!("Empty shader tag in {tag:?}")));
        }

        for range in [self.opaque_range, self.transparent_range] {
            if !range.is_valid() {
                return Err(PipelineError::InvalidQueueRange(range));
            }
        }

        if !self.opaque_range.is_below(&self.transparent_range) {
            return Err(PipelineError::OverlappingQueueRanges {
                opaque: self.opaque_range,
                transparent: self.transparent_range,
            });
        }

        Ok(())
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration for an application hosting the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Logger setup
    pub logging: LoggingConfig,
    /// Pipeline to create
    pub pipeline: PipelineAsset,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.pipeline.settings.validate()
    }
}

impl Config for ApplicationConfig {}
