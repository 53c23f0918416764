//! Surface materials.
//!
//! A material is one of a small fixed set of kinds. Every material also
//! carries diffuse, specular and emitted colors so property editors can
//! treat all kinds uniformly, even where a kind ignores some of them.

use lumen_math::Color;
use thiserror::Error;

/// Errors raised when building or editing a material.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    #[error("refraction index must be finite and positive, got {0}")]
    InvalidRefractionIndex(f32),

    #[error("unknown material type '{0}'")]
    UnknownKind(String),

    #[error("{kind} expects {expected} fields, found {found}")]
    FieldCount {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
}

/// The scattering model of a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Ideal diffuse reflector.
    Lambertian,
    /// Reflective metal. `fuzz` is in [0, 1], 0 = perfect mirror.
    Metal { fuzz: f32 },
    /// Glass-like refractor.
    Dielectric { refraction_index: f32 },
    /// Light source; terminates paths.
    Emissive,
}

impl MaterialKind {
    /// Every type name understood by [`MaterialKind::from_type_name`].
    pub const TYPE_NAMES: [&'static str; 4] = ["Lambertian", "Metal", "Dielectric", "Emissive"];

    pub fn type_name(&self) -> &'static str {
        match self {
            MaterialKind::Lambertian => "Lambertian",
            MaterialKind::Metal { .. } => "Metal",
            MaterialKind::Dielectric { .. } => "Dielectric",
            MaterialKind::Emissive => "Emissive",
        }
    }

    /// Number of scalar parameters the kind carries beyond the three colors.
    pub fn parameter_count(&self) -> usize {
        match self {
            MaterialKind::Metal { .. } | MaterialKind::Dielectric { .. } => 1,
            MaterialKind::Lambertian | MaterialKind::Emissive => 0,
        }
    }

    /// Kind with default parameters for a type name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "Lambertian" => Some(MaterialKind::Lambertian),
            "Metal" => Some(MaterialKind::Metal { fuzz: 0.0 }),
            "Dielectric" => Some(MaterialKind::Dielectric {
                refraction_index: 1.5,
            }),
            "Emissive" => Some(MaterialKind::Emissive),
            _ => None,
        }
    }
}

/// A surface material.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    kind: MaterialKind,
    /// Diffuse color; doubles as albedo for metals and dielectrics
    diffuse: Color,
    /// Specular color used by the direct lighting term
    specular: Color,
    /// Emitted radiance; only emissive materials actually emit
    emitted: Color,
}

/// Default specular color for new materials.
pub const DEFAULT_SPECULAR: Color = Color::splat(0.5);

impl Material {
    /// Diffuse material with the given color.
    pub fn lambertian(diffuse: Color) -> Self {
        Self {
            kind: MaterialKind::Lambertian,
            diffuse,
            specular: DEFAULT_SPECULAR,
            emitted: Color::ZERO,
        }
    }

    /// Metal with the given albedo. `fuzz` is clamped to [0, 1].
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Self {
            kind: MaterialKind::Metal {
                fuzz: clamp_fuzz(fuzz),
            },
            diffuse: albedo,
            specular: DEFAULT_SPECULAR,
            emitted: Color::ZERO,
        }
    }

    /// Dielectric with the given albedo and index of refraction
    /// (1.0 = air, 1.5 = glass, 2.4 = diamond).
    pub fn dielectric(albedo: Color, refraction_index: f32) -> Result<Self, MaterialError> {
        validate_refraction_index(refraction_index)?;
        Ok(Self {
            kind: MaterialKind::Dielectric { refraction_index },
            diffuse: albedo,
            specular: DEFAULT_SPECULAR,
            emitted: Color::ZERO,
        })
    }

    /// Light-emitting material.
    pub fn emissive(emitted: Color) -> Self {
        Self {
            kind: MaterialKind::Emissive,
            diffuse: Color::ZERO,
            specular: Color::ZERO,
            emitted,
        }
    }

    /// Build a material from a serialized record.
    ///
    /// `fields` holds diffuse, specular and emitted (three floats each)
    /// followed by the kind's scalar parameters.
    pub fn from_record(type_name: &str, fields: &[f32]) -> Result<Self, MaterialError> {
        let kind = MaterialKind::from_type_name(type_name)
            .ok_or_else(|| MaterialError::UnknownKind(type_name.to_string()))?;

        let expected = 9 + kind.parameter_count();
        if fields.len() != expected {
            return Err(MaterialError::FieldCount {
                kind: kind.type_name(),
                expected,
                found: fields.len(),
            });
        }

        let color = |i: usize| Color::new(fields[i], fields[i + 1], fields[i + 2]);
        let kind = match kind {
            MaterialKind::Metal { .. } => MaterialKind::Metal {
                fuzz: clamp_fuzz(fields[9]),
            },
            MaterialKind::Dielectric { .. } => {
                validate_refraction_index(fields[9])?;
                MaterialKind::Dielectric {
                    refraction_index: fields[9],
                }
            }
            other => other,
        };

        Ok(Self {
            kind,
            diffuse: color(0),
            specular: color(3),
            emitted: color(6),
        })
    }

    /// Flatten into the record layout read by [`Material::from_record`].
    pub fn to_record(&self) -> Vec<f32> {
        let mut fields = Vec::with_capacity(10);
        for color in [self.diffuse, self.specular, self.emitted] {
            fields.extend_from_slice(&color.to_array());
        }
        match self.kind {
            MaterialKind::Metal { fuzz } => fields.push(fuzz),
            MaterialKind::Dielectric { refraction_index } => fields.push(refraction_index),
            MaterialKind::Lambertian | MaterialKind::Emissive => {}
        }
        fields
    }

    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    /// Human-readable type name ("Lambertian", "Metal", ...).
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn is_emissive(&self) -> bool {
        matches!(self.kind, MaterialKind::Emissive)
    }

    pub fn diffuse(&self) -> Color {
        self.diffuse
    }

    pub fn set_diffuse(&mut self, diffuse: Color) {
        self.diffuse = diffuse;
    }

    pub fn specular(&self) -> Color {
        self.specular
    }

    pub fn set_specular(&mut self, specular: Color) {
        self.specular = specular;
    }

    pub fn emitted(&self) -> Color {
        self.emitted
    }

    pub fn set_emitted(&mut self, emitted: Color) {
        self.emitted = emitted;
    }

    /// Fuzz of a metal, `None` for other kinds.
    pub fn fuzz(&self) -> Option<f32> {
        match self.kind {
            MaterialKind::Metal { fuzz } => Some(fuzz),
            _ => None,
        }
    }

    /// Set the fuzz of a metal (clamped to [0, 1]). Returns false for other kinds.
    pub fn set_fuzz(&mut self, fuzz: f32) -> bool {
        match &mut self.kind {
            MaterialKind::Metal { fuzz: current } => {
                *current = clamp_fuzz(fuzz);
                true
            }
            _ => false,
        }
    }

    /// Refraction index of a dielectric, `None` for other kinds.
    pub fn refraction_index(&self) -> Option<f32> {
        match self.kind {
            MaterialKind::Dielectric { refraction_index } => Some(refraction_index),
            _ => None,
        }
    }

    /// Set the refraction index of a dielectric. Returns `Ok(false)` for other kinds.
    pub fn set_refraction_index(&mut self, refraction_index: f32) -> Result<bool, MaterialError> {
        validate_refraction_index(refraction_index)?;
        match &mut self.kind {
            MaterialKind::Dielectric {
                refraction_index: current,
            } => {
                *current = refraction_index;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::lambertian(Color::splat(0.5)) // Grey default
    }
}

fn clamp_fuzz(fuzz: f32) -> f32 {
    if fuzz.is_nan() {
        0.0
    } else {
        fuzz.clamp(0.0, 1.0)
    }
}

fn validate_refraction_index(refraction_index: f32) -> Result<(), MaterialError> {
    if refraction_index.is_finite() && refraction_index > 0.0 {
        Ok(())
    } else {
        Err(MaterialError::InvalidRefractionIndex(refraction_index))
    }
}
