//! Reference scene and visibility provider
//!
//! Hosts that own their own culling implement
//! [`FrameContext::query_visibility`](crate::render::FrameContext::query_visibility)
//! directly. [`Scene`] is a simple list-based provider for hosts that do
//! not, and for tests: it performs linear frustum culling of bounding boxes
//! and light volumes.

use slotmap::{new_key_type, SlotMap};
use std::sync::Arc;

use crate::foundation::math::{Mat4, Vec3};
use crate::render::{Material, Viewpoint};
use crate::scene::{VisibilityResult, VisibleDrawable, VisibleLight, AABB};

new_key_type! {
    /// Stable handle to a drawable in a [`Scene`]
    pub struct DrawableId;
    /// Stable handle to a light in a [`Scene`]
    pub struct LightId;
}

/// Handle to host-owned geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Geometry + material + transform, read-only to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    /// Geometry reference
    pub mesh: MeshHandle,
    /// Material reference
    pub material: Arc<Material>,
    /// Model-to-world transform
    pub transform: Mat4,
    /// Bounds in model space
    pub local_bounds: AABB,
}

impl Drawable {
    /// Create a drawable with unit bounds at the origin
    pub fn new(mesh: MeshHandle, material: Arc<Material>) -> Self {
        Self {
            mesh,
            material,
            transform: Mat4::identity(),
            local_bounds: AABB::from_center_extents(Vec3::zeros(), Vec3::repeat(0.5)),
        }
    }

    /// Set the model-to-world transform
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Place the drawable at `position`
    pub fn at(self, position: Vec3) -> Self {
        self.with_transform(Mat4::new_translation(&position))
    }

    /// Set the model-space bounds
    pub fn with_bounds(mut self, bounds: AABB) -> Self {
        self.local_bounds = bounds;
        self
    }

    /// Bounds in world space
    pub fn world_bounds(&self) -> AABB {
        self.local_bounds.transformed(&self.transform)
    }
}

/// Light source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Infinitely distant light, affects every viewpoint
    Directional {
        /// Direction the light travels
        direction: Vec3,
        /// Linear RGB color
        color: Vec3,
        /// Intensity multiplier
        intensity: f32,
    },
    /// Local light with a finite range
    Point {
        /// World-space position
        position: Vec3,
        /// Distance beyond which the light has no effect
        range: f32,
        /// Linear RGB color
        color: Vec3,
        /// Intensity multiplier
        intensity: f32,
    },
}

/// List-based scene used as a visibility provider
#[derive(Debug, Default)]
pub struct Scene {
    drawables: SlotMap<DrawableId, Drawable>,
    lights: SlotMap<LightId, Light>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drawable
    pub fn add_drawable(&mut self, drawable: Drawable) -> DrawableId {
        self.drawables.insert(drawable)
    }

    /// Remove a drawable
    pub fn remove_drawable(&mut self, id: DrawableId) -> Option<Drawable> {
        self.drawables.remove(id)
    }

    /// Look up a drawable
    pub fn drawable(&self, id: DrawableId) -> Option<&Drawable> {
        self.drawables.get(id)
    }

    /// Add a light
    pub fn add_light(&mut self, light: Light) -> LightId {
        self.lights.insert(light)
    }

    /// Remove a light
    pub fn remove_light(&mut self, id: LightId) -> Option<Light> {
        self.lights.remove(id)
    }

    /// Number of drawables
    pub fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    /// Number of lights
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Cull the scene against a viewpoint
    ///
    /// Returns an empty result when the viewpoint has no valid frustum.
    pub fn cull(&self, viewpoint: &Viewpoint) -> VisibilityResult {
        let Some(params) = viewpoint.culling_parameters() else {
            log::trace!("Viewpoint '{}' has no valid frustum; nothing visible", viewpoint.name);
            return VisibilityResult::empty();
        };

        let mut drawables = Vec::new();
        for (id, drawable) in &self.drawables {
            let bounds = drawable.world_bounds();
            if !params.frustum.intersects_aabb(&bounds) {
                continue;
            }

            let order = u32::try_from(drawables.len()).unwrap_or(u32::MAX);
            drawables.push(VisibleDrawable {
                id,
                mesh: drawable.mesh,
                material: Arc::clone(&drawable.material),
                depth: params.view_depth(bounds.center()),
                order,
            });
        }

        let lights = self
            .lights
            .iter()
            .filter(|(_, light)| match light {
                Light::Directional { .. } => true,
                Light::Point { position, range, .. } => params.frustum.intersects_sphere(*position, *range),
            })
            .map(|(id, light)| VisibleLight { id, light: *light })
            .collect::<Vec<_>>();

        log::trace!(
            "Culled '{}': {}/{} drawables, {}/{} lights visible",
            viewpoint.name,
            drawables.len(),
            self.drawables.len(),
            lights.len(),
            self.lights.len()
        );

        VisibilityResult::new(drawables, lights)
    }
}
