//! Whitted Core - Scene description and scene file loading.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `SceneBuilder`, `Material`, `Object`,
//!   `SphereObject`, `Light`
//! - **Scene files**: OBJ-style geometry with MTL-style material libraries
//!
//! # Example
//!
//! ```ignore
//! use whitted_core::obj::load_scene;
//!
//! let scene = load_scene("scene.obj")?;
//! println!("Loaded {} triangles, {} spheres",
//!     scene.objects().len(),
//!     scene.sphere_objects().len());
//! ```

pub mod obj;
pub mod scene;

// Re-export commonly used types
pub use obj::{load_scene, load_scene_with, LoadError};
pub use scene::{
    Light, Material, MaterialId, Object, Scene, SceneBuilder, SceneError, SphereObject,
    VertexNormals,
};
