//! # Core Module
//!
//! Shared configuration for the pipeline and the applications hosting it.

pub mod config;

pub use config::{ApplicationConfig, BuildMode, Config, ConfigError, PipelineSettings};
