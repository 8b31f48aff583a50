//! Per-frame visibility results

use std::sync::Arc;

use crate::render::Material;
use crate::scene::{DrawableId, Light, LightId, MeshHandle};

/// A drawable that survived culling for one viewpoint
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleDrawable {
    /// Scene handle of the drawable
    pub id: DrawableId,
    /// Geometry to draw
    pub mesh: MeshHandle,
    /// Material assigned to the drawable
    pub material: Arc<Material>,
    /// View-space depth of the drawable's bounds center
    pub depth: f32,
    /// Position in the visibility result, used as the final sort tie-breaker
    pub order: u32,
}

/// A light affecting one viewpoint
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleLight {
    /// Scene handle of the light
    pub id: LightId,
    /// Light parameters
    pub light: Light,
}

/// Drawables and lights visible from a viewpoint
///
/// Valid only for the frame it was produced in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityResult {
    drawables: Vec<VisibleDrawable>,
    lights: Vec<VisibleLight>,
}

impl VisibilityResult {
    /// Result with nothing visible
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a result from culled drawables and lights
    pub fn new(drawables: Vec<VisibleDrawable>, lights: Vec<VisibleLight>) -> Self {
        Self { drawables, lights }
    }

    /// Visible drawables in culling order
    pub fn drawables(&self) -> &[VisibleDrawable] {
        &self.drawables
    }

    /// Visible lights
    pub fn lights(&self) -> &[VisibleLight] {
        &self.lights
    }

    /// Whether nothing at all is visible
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty() && self.lights.is_empty()
    }
}
