//! # Viewpoints
//!
//! A viewpoint is the camera definition for one pass through the per-view
//! renderer: where it looks from, how it projects, and how its target is
//! cleared before anything is drawn.
//!
//! ## Coordinate System
//! Right-handed, Y-up world space. In view space the camera looks down -Z;
//! "view depth" used for draw ordering is the distance along the viewing
//! direction, positive in front of the camera.

use bitflags::bitflags;

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use crate::render::Color;
use crate::scene::Frustum;

bitflags! {
    /// Which parts of the render target a viewpoint clears
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        /// Clear the depth buffer
        const DEPTH = 0b01;
        /// Clear the color buffer to the background color
        const COLOR = 0b10;
    }
}

impl Default for ClearFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// What a viewpoint is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewpointKind {
    /// In-game camera
    #[default]
    Game,
    /// Editor scene view; hosts may emit extra world geometry for it
    SceneView,
    /// Thumbnail or inspector preview
    Preview,
}

/// Camera definition for a single view of the frame
#[derive(Debug, Clone, PartialEq)]
pub struct Viewpoint {
    /// Name used in logs and traces
    pub name: String,

    /// What this viewpoint is used for
    pub kind: ViewpointKind,

    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,

    /// Buffers cleared before drawing
    pub clear_flags: ClearFlags,

    /// Color used when clearing the color buffer
    pub background_color: Color,
}

impl Viewpoint {
    /// Create a perspective viewpoint looking at the origin
    ///
    /// # Example
    /// ```rust
    /// use forward_pipeline::foundation::math::Vec3;
    /// use forward_pipeline::render::Viewpoint;
    ///
    /// let main = Viewpoint::perspective("Main", Vec3::new(0.0, 2.0, 5.0), 60.0, 16.0 / 9.0, 0.1, 100.0);
    /// assert!(main.culling_parameters().is_some());
    /// ```
    pub fn perspective(
        name: impl Into<String>,
        position: Vec3,
        fov_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ViewpointKind::Game,
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
            clear_flags: ClearFlags::all(),
            background_color: Color::SKY,
        }
    }

    /// Point the viewpoint at `target`
    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Set the up vector
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    /// Set the clear flags
    pub fn with_clear_flags(mut self, clear_flags: ClearFlags) -> Self {
        self.clear_flags = clear_flags;
        self
    }

    /// Set the background color
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the viewpoint kind
    pub fn with_kind(mut self, kind: ViewpointKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether the depth buffer is cleared
    pub fn clear_depth(&self) -> bool {
        self.clear_flags.contains(ClearFlags::DEPTH)
    }

    /// Whether the color buffer is cleared
    pub fn clear_color(&self) -> bool {
        self.clear_flags.contains(ClearFlags::COLOR)
    }

    /// Generate view matrix for world-to-camera space transformation
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Generate perspective projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Generate combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Whether the projection parameters describe a usable view volume
    pub fn has_valid_frustum(&self) -> bool {
        let finite = [self.fov, self.aspect, self.near, self.far]
            .iter()
            .all(|v| v.is_finite());
        let direction = self.target - self.position;

        finite
            && self.near > 0.0
            && self.far > self.near
            && self.aspect > 0.0
            && self.fov > 0.0
            && self.fov < std::f32::consts::PI
            && direction.norm() > f32::EPSILON
            && direction.cross(&self.up).norm() > f32::EPSILON
    }

    /// Culling parameters for this viewpoint
    ///
    /// `None` when the viewpoint has no valid frustum; callers treat that as
    /// "nothing is visible".
    pub fn culling_parameters(&self) -> Option<CullingParameters> {
        if !self.has_valid_frustum() {
            return None;
        }

        let frustum = Frustum::from_matrix(&self.view_projection_matrix())?;
        Some(CullingParameters {
            frustum,
            eye: self.position,
            forward: (self.target - self.position).normalize(),
        })
    }
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self::perspective("Main Camera", Vec3::new(0.0, 3.0, 3.0), 45.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

/// Frustum and viewing direction derived from a valid viewpoint
#[derive(Debug, Clone, PartialEq)]
pub struct CullingParameters {
    /// View volume in world space
    pub frustum: Frustum,
    /// Camera position
    pub eye: Vec3,
    /// Normalized viewing direction
    pub forward: Vec3,
}

impl CullingParameters {
    /// Distance of `point` in front of the camera along the viewing direction
    pub fn view_depth(&self, point: Vec3) -> f32 {
        (point - self.eye).dot(&self.forward)
    }
}
