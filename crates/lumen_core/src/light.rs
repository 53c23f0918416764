//! Analytic point lights used by the direct lighting term.

use lumen_math::{Color, Vec3};

/// A point light with Phong-style intensities.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Display name (assigned by the scene when empty)
    pub name: String,
    /// World position
    pub position: Vec3,
    /// Ambient intensity, independent of geometry
    pub ambient: Color,
    /// Diffuse intensity, scaled by the cosine to the light
    pub diffuse: Color,
    /// Specular intensity, scaled by the view-dependent highlight
    pub specular: Color,
    /// Specular exponent
    pub power: f32,
}

impl Light {
    pub fn new(ambient: Color, diffuse: Color, specular: Color, power: f32) -> Self {
        Self {
            name: String::new(),
            position: Vec3::ZERO,
            ambient,
            diffuse,
            specular,
            power,
        }
    }

    /// Give the light an explicit display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn type_name(&self) -> &'static str {
        "Light"
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Color::splat(0.05), Color::splat(0.8), Color::splat(0.5), 32.0)
    }
}
