//! Lumen Core - Scene model for the Lumen path tracer.
//!
//! This crate provides:
//!
//! - **Scene model**: `Scene`, `Primitive`, `Material`, `Light`, addressed by
//!   versioned slot-map keys
//! - **Intersection**: analytic ray queries for spheres, planes, polygons and cubes
//! - **Scene files**: a line-oriented text format for saving and loading scenes
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{Material, Primitive, Scene};
//! use lumen_math::{Ray, Vec3};
//!
//! let mut scene = Scene::new();
//! let red = scene.add_material(Material::lambertian(Vec3::new(0.8, 0.1, 0.1)));
//! scene.add_primitive(Vec3::ZERO, Primitive::sphere(1.0, red))?;
//!
//! let hit = scene.intersect(&Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z));
//! assert!(hit.is_some());
//! ```

pub mod geometry;
pub mod light;
pub mod material;
pub mod primitive;
pub mod scene;
pub mod scene_file;

// Re-export commonly used types
pub use geometry::SurfaceHit;
pub use light::Light;
pub use material::{Material, MaterialError, MaterialKind};
pub use primitive::{Primitive, Shape};
pub use scene::{HitRecord, LightId, MaterialId, PrimitiveId, Scene, SceneError, HIT_EPSILON};
pub use scene_file::{
    load_scene, load_scene_from_bytes, load_scene_from_str, save_scene, scene_to_string, LineError, LoadReport,
    SceneFileError,
};
