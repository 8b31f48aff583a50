//! Pipeline driver and the asset that creates it

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Config;
use crate::core::PipelineSettings;
use crate::render::{FrameContext, PipelineError, ViewRenderer, Viewpoint};

/// Summary of one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Zero-based index of the frame
    pub frame_index: u64,
    /// Number of viewpoints rendered
    pub viewpoints: usize,
}

/// Forward render pipeline
///
/// Owns the per-view renderer and drives it over every viewpoint of a frame.
/// A frame context is borrowed exclusively for the whole of
/// [`render_frame`](Self::render_frame).
#[derive(Debug)]
pub struct ForwardPipeline {
    settings: PipelineSettings,
    view_renderer: ViewRenderer,
    frame_count: u64,
}

impl ForwardPipeline {
    /// Create a pipeline, validating `settings`
    pub fn new(settings: PipelineSettings) -> Result<Self, PipelineError> {
        settings.validate()?;

        log::info!(
            "Creating forward pipeline ({:?}, tags: {:?})",
            settings.build_mode,
            settings.shader_tags.iter().map(|tag| tag.name()).collect::<Vec<_>>()
        );

        Ok(Self {
            view_renderer: ViewRenderer::new(&settings),
            settings,
            frame_count: 0,
        })
    }

    /// Settings the pipeline was created from
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Number of frames rendered so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Render every viewpoint in order, then submit once
    ///
    /// Viewpoints are rendered strictly in the order given; callers place
    /// overlays such as UI after the world views they composite over.
    pub fn render_frame<C: FrameContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        viewpoints: &[Viewpoint],
    ) -> FrameStats {
        let frame_index = self.frame_count;
        log::trace!("Begin frame {} ({} viewpoints)", frame_index, viewpoints.len());

        for viewpoint in viewpoints {
            self.view_renderer.render_view(ctx, viewpoint);
        }

        ctx.submit();
        self.frame_count += 1;

        log::trace!("End frame {}", frame_index);
        FrameStats {
            frame_index,
            viewpoints: viewpoints.len(),
        }
    }

    /// Render a single viewpoint without submitting
    pub fn render_view<C: FrameContext + ?Sized>(&mut self, ctx: &mut C, viewpoint: &Viewpoint) {
        self.view_renderer.render_view(ctx, viewpoint);
    }
}

/// Serializable description of a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineAsset {
    /// Display name of the asset
    pub name: String,
    /// Settings handed to the pipeline
    pub settings: PipelineSettings,
}

impl PipelineAsset {
    /// Create an asset with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: PipelineSettings::default(),
        }
    }

    /// Replace the settings
    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Load an asset from a `.toml` or `.ron` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        Ok(Self::load_from_file(path)?)
    }

    /// Create a pipeline from this asset
    pub fn create_pipeline(&self) -> Result<ForwardPipeline, PipelineError> {
        log::debug!("Creating pipeline from asset '{}'", self.name);
        ForwardPipeline::new(self.settings.clone())
    }
}

impl Default for PipelineAsset {
    fn default() -> Self {
        Self::new("Forward Pipeline")
    }
}

impl Config for PipelineAsset {}
