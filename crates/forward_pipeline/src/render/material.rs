//! Materials, shader pass tags and render queue ranges
//!
//! A material carries the render queue value that buckets it into the opaque
//! or transparent pass, and the set of shader pass tags it implements. The
//! pipeline draws a material only through a pass whose tag it recognizes.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Identifier selecting which pass of a shader to execute
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShaderTagId(Cow<'static, str>);

impl ShaderTagId {
    /// Tag of the pass drawn by the default unlit pipeline shaders
    pub const SRP_DEFAULT_UNLIT: Self = Self::from_static("SRPDefaultUnlit");

    /// Create a tag from a static string
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Create a tag from any string
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Tag name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShaderTagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ShaderTagId {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

/// Pass tags of the built-in forward shaders that predate this pipeline
///
/// Only one fallback pass is drawn for materials lacking a recognized tag;
/// these tags are not matched individually.
pub const LEGACY_SHADER_TAGS: [ShaderTagId; 6] = [
    ShaderTagId::from_static("Always"),
    ShaderTagId::from_static("ForwardBase"),
    ShaderTagId::from_static("PrepassBase"),
    ShaderTagId::from_static("Vertex"),
    ShaderTagId::from_static("VertexLMRGBM"),
    ShaderTagId::from_static("VertexLM"),
];

/// Named render queue values
pub mod queue {
    /// Drawn before everything else
    pub const BACKGROUND: i32 = 1000;
    /// Default for opaque geometry
    pub const GEOMETRY: i32 = 2000;
    /// Alpha-tested geometry, drawn after plain opaque geometry
    pub const ALPHA_TEST: i32 = 2450;
    /// Last queue value still treated as opaque
    pub const GEOMETRY_LAST: i32 = 2500;
    /// Default for alpha-blended geometry
    pub const TRANSPARENT: i32 = 3000;
    /// Overlay effects drawn last
    pub const OVERLAY: i32 = 4000;
    /// Highest queue value
    pub const MAX: i32 = 5000;
}

/// Inclusive range of render queue values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderQueueRange {
    /// Lowest queue value in the range
    pub lower_bound: i32,
    /// Highest queue value in the range
    pub upper_bound: i32,
}

impl RenderQueueRange {
    /// Queue values drawn by the opaque pass
    pub const OPAQUE: Self = Self::new(0, queue::GEOMETRY_LAST);
    /// Queue values drawn by the transparent pass
    pub const TRANSPARENT: Self = Self::new(queue::GEOMETRY_LAST + 1, queue::MAX);
    /// Every queue value
    pub const ALL: Self = Self::new(0, queue::MAX);

    /// Create a range from inclusive bounds
    pub const fn new(lower_bound: i32, upper_bound: i32) -> Self {
        Self { lower_bound, upper_bound }
    }

    /// Whether `value` falls inside the range
    pub const fn contains(&self, value: i32) -> bool {
        value >= self.lower_bound && value <= self.upper_bound
    }

    /// Whether the bounds are ordered
    pub const fn is_valid(&self) -> bool {
        self.lower_bound <= self.upper_bound
    }

    /// Whether every value of `self` lies strictly below every value of `other`
    pub const fn is_below(&self, other: &Self) -> bool {
        self.upper_bound < other.lower_bound
    }
}

impl fmt::Display for RenderQueueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower_bound, self.upper_bound)
    }
}

/// Unique identifier for materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// Identifier reserved for the fallback error material
    pub const ERROR: Self = Self(u32::MAX);
}

/// Material resource as seen by the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Unique identifier for this material
    pub id: MaterialId,
    /// Name for logs and traces
    pub name: String,
    /// Render queue value deciding the pass this material is drawn in
    pub render_queue: i32,
    /// Shader pass tags implemented by this material's shader
    pub passes: Vec<ShaderTagId>,
}

impl Material {
    /// Create an opaque material with no passes
    pub fn new(id: MaterialId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            render_queue: queue::GEOMETRY,
            passes: Vec::new(),
        }
    }

    /// Set the render queue value, clamped to `0..=queue::MAX`
    pub fn with_queue(mut self, render_queue: i32) -> Self {
        let clamped = render_queue.clamp(0, queue::MAX);
        if clamped != render_queue {
            log::warn!(
                "Material '{}': render queue {} outside {}, using {}",
                self.name,
                render_queue,
                RenderQueueRange::ALL,
                clamped
            );
        }
        self.render_queue = clamped;
        self
    }

    /// Add a shader pass
    pub fn with_pass(mut self, tag: impl Into<ShaderTagId>) -> Self {
        self.passes.push(tag.into());
        self
    }

    /// First tag of `tags` implemented by this material, in `tags` order
    pub fn matching_pass<'a>(&self, tags: &'a [ShaderTagId]) -> Option<&'a ShaderTagId> {
        tags.iter().find(|tag| self.passes.contains(tag))
    }
}

/// Shader name of the fallback material for unsupported shaders
pub const ERROR_SHADER_NAME: &str = "Hidden/InternalErrorShader";

static ERROR_MATERIAL: OnceLock<Arc<Material>> = OnceLock::new();

/// Process-wide material drawn in place of materials the pipeline cannot render
///
/// Created on first use and kept for the lifetime of the process; every
/// caller receives the same instance.
pub fn error_material() -> Arc<Material> {
    ERROR_MATERIAL
        .get_or_init(|| {
            log::debug!("Creating fallback material '{}'", ERROR_SHADER_NAME);
            Arc::new(Material::new(MaterialId::ERROR, ERROR_SHADER_NAME))
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_ranges_are_disjoint_and_ordered() {
        assert!(RenderQueueRange::OPAQUE.is_below(&RenderQueueRange::TRANSPARENT));
        assert!(!RenderQueueRange::TRANSPARENT.is_below(&RenderQueueRange::OPAQUE));
        assert!(RenderQueueRange::ALL.contains(queue::BACKGROUND));
        assert!(RenderQueueRange::ALL.contains(queue::OVERLAY));
    }

    #[test]
    fn test_named_queues_land_in_expected_range() {
        for value in [queue::BACKGROUND, queue::GEOMETRY, queue::ALPHA_TEST, queue::GEOMETRY_LAST] {
            assert!(RenderQueueRange::OPAQUE.contains(value), "{value} should be opaque");
            assert!(!RenderQueueRange::TRANSPARENT.contains(value));
        }
        for value in [queue::TRANSPARENT, queue::OVERLAY, queue::MAX] {
            assert!(RenderQueueRange::TRANSPARENT.contains(value), "{value} should be transparent");
            assert!(!RenderQueueRange::OPAQUE.contains(value));
        }
    }

    #[test]
    fn test_matching_pass_follows_tag_order() {
        let material = Material::new(MaterialId(1), "Lit")
            .with_pass("ForwardBase")
            .with_pass(ShaderTagId::SRP_DEFAULT_UNLIT);
        let tags = [ShaderTagId::SRP_DEFAULT_UNLIT, ShaderTagId::from_static("ForwardBase")];

        assert_eq!(material.matching_pass(&tags), Some(&ShaderTagId::SRP_DEFAULT_UNLIT));
        assert_eq!(material.matching_pass(&tags[1..]).map(ShaderTagId::name), Some("ForwardBase"));
        assert_eq!(material.matching_pass(&[ShaderTagId::new("ShadowCaster")]), None);
    }

    #[test]
    fn test_out_of_range_queue_is_clamped() {
        let overlay = Material::new(MaterialId(1), "Overlay").with_queue(queue::MAX + 1);
        let below = Material::new(MaterialId(2), "Below").with_queue(-10);

        assert_eq!(overlay.render_queue, queue::MAX);
        assert_eq!(below.render_queue, 0);
        assert!(RenderQueueRange::ALL.contains(overlay.render_queue));

        let cutout = Material::new(MaterialId(3), "Cutout").with_queue(queue::ALPHA_TEST);
        assert_eq!(cutout.render_queue, queue::ALPHA_TEST);
    }

    #[test]
    fn test_owned_and_static_tags_compare_equal() {
        assert_eq!(ShaderTagId::new("SRPDefaultUnlit"), ShaderTagId::SRP_DEFAULT_UNLIT);
    }

    #[test]
    fn test_error_material_is_shared() {
        let first = error_material();
        let second = error_material();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.id, MaterialId::ERROR);
        assert_eq!(first.name, ERROR_SHADER_NAME);
    }
}
