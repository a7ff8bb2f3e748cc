//! Scroll-synced image gallery: DOM images mirrored as textured planes
//! with a pointer-driven hover distortion.
//!
//! GPU-free. [`GalleryEngine`](crate::engine::GalleryEngine) renders a
//! [`GalleryScene`].

/// Hit testing and the hover policy.
pub mod hover;
/// DOM box to world layout.
pub mod layout;
/// Tracked planes and their layout source.
pub mod registry;
/// The scene session.
pub mod scene;

pub use hover::Intersection;
pub use layout::{plane_layout, DomRect, PlaneGeometry, PlaneLayout};
pub use registry::{
    image_source, ElementKey, LayoutSource, MeshRegistry, TextureState, TrackedMesh,
};
pub use scene::GalleryScene;
