//! Scene data and visibility
//!
//! Provides the drawable/light storage, bounding volumes and frustum culling
//! that back the visibility query of a frame context.

mod scene_data;
mod scene_graph;
mod visibility;

pub use scene_data::{Drawable, DrawableId, Light, LightId, MeshHandle, Scene};
pub use scene_graph::{Frustum, Plane, AABB};
pub use visibility::{VisibilityResult, VisibleDrawable, VisibleLight};
