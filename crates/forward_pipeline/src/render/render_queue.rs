//! # Render Queue System
//!
//! Turns a visibility result into an ordered list of draw calls for one pass.
//!
//! ## Architecture
//!
//! - **FilteringSettings**: which render queue values a pass accepts
//! - **DrawingSettings**: which shader passes are drawn, how draws are sorted,
//!   and an optional material override
//! - **SortingCriteria**: front-to-back for opaque geometry, back-to-front for
//!   transparent geometry
//! - **build_draw_list**: filters, selects passes, and sorts
//!
//! Frame contexts call [`build_draw_list`] from their `draw_filtered`
//! implementation and encode the resulting calls.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::render::{Material, MaterialId, RenderQueueRange, ShaderTagId};
use crate::scene::{DrawableId, MeshHandle, VisibilityResult};

/// Draw ordering applied by a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortingCriteria {
    /// Keep visibility order
    #[default]
    None,
    /// Opaque objects front-to-back (near to far) for early depth rejection,
    /// grouping equal depths by material
    CommonOpaque,
    /// Transparent objects back-to-front (far to near) for correct alpha blending
    CommonTransparent,
}

impl SortingCriteria {
    /// Compare two sort keys under this criteria
    pub fn compare(self, a: &SortKey, b: &SortKey) -> Ordering {
        match self {
            Self::None => a.order.cmp(&b.order),
            Self::CommonOpaque => a
                .depth
                .total_cmp(&b.depth)
                .then_with(|| a.material.cmp(&b.material))
                .then_with(|| a.order.cmp(&b.order)),
            Self::CommonTransparent => b
                .depth
                .total_cmp(&a.depth)
                .then_with(|| a.order.cmp(&b.order)),
        }
    }
}

/// Per-draw key derived from material state and view-space depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortKey {
    /// View-space depth, positive in front of the camera
    pub depth: f32,
    /// Material, so equal depths batch by state
    pub material: MaterialId,
    /// Visibility order, ensuring stable ordering
    pub order: u32,
}

/// Which drawables a pass selects by their shader passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PassSelection {
    /// Drawables implementing at least one of the pass tags
    #[default]
    Matching,
    /// Drawables implementing none of the pass tags
    Unsupported,
}

/// How a pass draws the drawables it accepts
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSettings {
    /// Draw ordering
    pub sorting: SortingCriteria,
    /// Shader pass tags considered by this pass, in priority order
    pub shader_tags: Vec<ShaderTagId>,
    /// Whether drawables matching or lacking the tags are drawn
    pub selection: PassSelection,
    /// Material drawn instead of each drawable's own material
    pub override_material: Option<Arc<Material>>,
}

impl DrawingSettings {
    /// Draw drawables implementing one of `shader_tags`, sorted by `sorting`
    pub fn new(shader_tags: Vec<ShaderTagId>, sorting: SortingCriteria) -> Self {
        Self {
            sorting,
            shader_tags,
            selection: PassSelection::Matching,
            override_material: None,
        }
    }

    /// Change which drawables are selected
    pub fn with_selection(mut self, selection: PassSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Draw every selected drawable with `material`
    pub fn with_override_material(mut self, material: Arc<Material>) -> Self {
        self.override_material = Some(material);
        self
    }
}

/// Which render queue values a pass accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilteringSettings {
    /// Accepted queue range
    pub render_queue_range: RenderQueueRange,
}

impl FilteringSettings {
    /// Accept drawables whose material queue lies in `render_queue_range`
    pub const fn new(render_queue_range: RenderQueueRange) -> Self {
        Self { render_queue_range }
    }

    /// Accept opaque queue values
    pub const fn opaque() -> Self {
        Self::new(RenderQueueRange::OPAQUE)
    }

    /// Accept transparent queue values
    pub const fn transparent() -> Self {
        Self::new(RenderQueueRange::TRANSPARENT)
    }

    /// Accept every queue value
    pub const fn all() -> Self {
        Self::new(RenderQueueRange::ALL)
    }
}

/// A single resolved draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Drawable being drawn
    pub drawable: DrawableId,
    /// Geometry
    pub mesh: MeshHandle,
    /// Material bound for the draw (the override material if one is set)
    pub material: Arc<Material>,
    /// Shader pass executed; `None` for the override material's default pass
    pub pass: Option<ShaderTagId>,
    /// Sort key the call was ordered by
    pub key: SortKey,
}

/// Filter, select and sort the visible drawables for one pass
pub fn build_draw_list(
    visibility: &VisibilityResult,
    drawing: &DrawingSettings,
    filtering: &FilteringSettings,
) -> Vec<DrawCall> {
    let mut calls: Vec<DrawCall> = visibility
        .drawables()
        .iter()
        .filter(|visible| filtering.render_queue_range.contains(visible.material.render_queue))
        .filter_map(|visible| {
            let matched = visible.material.matching_pass(&drawing.shader_tags);
            let pass = match (drawing.selection, matched) {
                (PassSelection::Matching, Some(tag)) => Some(tag.clone()),
                (PassSelection::Unsupported, None) => None,
                _ => return None,
            };

            let (material, pass) = match &drawing.override_material {
                Some(override_material) => (Arc::clone(override_material), None),
                None => (Arc::clone(&visible.material), pass),
            };

            Some(DrawCall {
                drawable: visible.id,
                mesh: visible.mesh,
                key: SortKey {
                    depth: visible.depth,
                    material: visible.material.id,
                    order: visible.order,
                },
                material,
                pass,
            })
        })
        .collect();

    calls.sort_by(|a, b| drawing.sorting.compare(&a.key, &b.key));
    calls
}
