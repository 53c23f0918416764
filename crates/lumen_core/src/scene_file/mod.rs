//! Scene text files.
//!
//! One entity per line. The first token names the entity type, followed by
//! its fields in a fixed order. Primitive lines continue with the material
//! type name and its fields.
//!
//! ```text
//! # comment
//! Sphere   px py pz  radius                  <material>
//! Plane    px py pz  nx ny nz                <material>
//! Polygon  px py pz  v0x v0y v0z  v1.. v2..  <material>
//! Cube     px py pz  half_size               <material>
//! Light    px py pz  ambient(3) diffuse(3) specular(3) power
//!
//! <material> = Lambertian | Metal | Dielectric | Emissive
//!              diffuse(3) specular(3) emitted(3) [fuzz | refraction_index]
//! ```
//!
//! Polygon vertices are offsets from the primitive position. Lines that
//! cannot be parsed are reported and skipped; the rest of the file still
//! loads.

mod parser;
mod writer;

use std::path::Path;

use thiserror::Error;

use crate::material::MaterialError;
use crate::scene::{LightId, PrimitiveId, Scene};

pub use parser::{load_scene_from_bytes, load_scene_from_str};
pub use writer::{scene_to_string, write_scene};

/// Fatal errors while reading or writing a scene file.
#[derive(Error, Debug)]
pub enum SceneFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A scene file line that was skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("line {line}: unknown entity type '{token}'")]
    UnknownType { line: usize, token: String },

    #[error("line {line}: {entity} expects {expected} fields, found {found}")]
    MissingFields {
        line: usize,
        entity: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: {entity} is missing its material")]
    MissingMaterial { line: usize, entity: &'static str },

    #[error("line {line}: {source}")]
    Material {
        line: usize,
        #[source]
        source: MaterialError,
    },

    #[error("line {line}: unexpected trailing token '{token}'")]
    TrailingTokens { line: usize, token: String },

    #[error("line {line}: not valid UTF-8")]
    InvalidUtf8 { line: usize },
}

impl LineError {
    /// 1-based line number of the offending line.
    pub fn line(&self) -> usize {
        match self {
            LineError::UnknownType { line, .. }
            | LineError::MissingFields { line, .. }
            | LineError::InvalidNumber { line, .. }
            | LineError::MissingMaterial { line, .. }
            | LineError::Material { line, .. }
            | LineError::TrailingTokens { line, .. }
            | LineError::InvalidUtf8 { line } => *line,
        }
    }
}

/// Outcome of loading a scene file.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Primitives added to the scene, in file order
    pub primitives: Vec<PrimitiveId>,
    /// Lights added to the scene, in file order
    pub lights: Vec<LightId>,
    /// Lines that were skipped
    pub skipped: Vec<LineError>,
}

impl LoadReport {
    /// True if every entity line loaded.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Load a scene file and add its entities to `scene`.
pub fn load_scene(path: impl AsRef<Path>, scene: &mut Scene) -> Result<LoadReport, SceneFileError> {
    let path = path.as_ref();
    let content = std::fs::read(path)?;
    let report = load_scene_from_bytes(&content, scene);

    log::info!(
        "Loaded {} primitives, {} lights from {:?} ({} lines skipped)",
        report.primitives.len(),
        report.lights.len(),
        path,
        report.skipped.len()
    );
    Ok(report)
}

/// Write every primitive and light of `scene` to a file.
pub fn save_scene(scene: &Scene, path: impl AsRef<Path>) -> Result<(), SceneFileError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_scene(scene, &mut writer)?;
    std::io::Write::flush(&mut writer)?;

    log::info!("Saved scene to {:?}", path);
    Ok(())
}
