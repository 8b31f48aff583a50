//! # Forward Pipeline
//!
//! A single-pass forward render pipeline. The host owns the device, the
//! scene and the render targets; each frame it hands the pipeline a
//! [`FrameContext`](render::FrameContext) and the viewpoints to render, and
//! the pipeline drives the frame through it.
//!
//! ## Features
//!
//! - **Per-viewpoint passes**: clear, opaque, background, transparent
//! - **Queue filtering**: opaque and transparent queue ranges, sorted front-to-back and back-to-front
//! - **Error fallback**: development builds draw unsupported materials with a visible error material
//! - **Profiling samples**: every viewpoint wrapped in a named sample, closed even on unwind
//! - **Config files**: pipeline assets and application config in TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use forward_pipeline::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = Scene::new();
//!     let material = Material::new(MaterialId(1), "Unlit").with_pass(ShaderTagId::SRP_DEFAULT_UNLIT);
//!     scene.add_drawable(Drawable::new(MeshHandle(1), std::sync::Arc::new(material)));
//!
//!     let mut pipeline = PipelineAsset::default().create_pipeline()?;
//!     let camera = Viewpoint::perspective("Main", Vec3::new(0.0, 2.0, 5.0), 60.0, 16.0 / 9.0, 0.1, 100.0);
//!
//!     let mut ctx = TraceContext::new(&scene);
//!     pipeline.render_frame(&mut ctx, &[camera]);
//!     for event in ctx.events() {
//!         println!("{event}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod render;
pub mod scene;

/// Common imports for pipeline users
pub mod prelude {
    pub use crate::{
        core::{ApplicationConfig, BuildMode, Config, PipelineSettings},
        foundation::{
            logging::{init_logging, LoggingConfig},
            math::{Mat4, Vec3},
        },
        render::{
            queue, ClearFlags, Color, CommandBuffer, DrawingSettings, FilteringSettings, ForwardPipeline,
            FrameContext, FrameEvent, FrameStats, Material, MaterialId, PipelineAsset, PipelineError,
            RenderQueueRange, ShaderTagId, SortingCriteria, TraceContext, Viewpoint, ViewpointKind,
        },
        scene::{Drawable, DrawableId, Light, MeshHandle, Scene, VisibilityResult},
    };
}
