//! Render configuration.

use lumen_math::Color;
use serde::{Deserialize, Serialize};

/// Default number of pixels per parallel work unit.
pub const DEFAULT_PIXEL_BUNCH_SIZE: usize = 256;

/// Upper bound on bounces; the integrator recurses once per bounce.
pub const MAX_RAY_DEPTH_LIMIT: u32 = 512;

/// Settings for one render pass.
///
/// Missing fields take their defaults when deserialized, so a JSON config
/// only needs to name the settings it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderProperties {
    /// Primary rays per pixel (>= 1); more than one jitters inside the pixel
    pub samples_per_pixel: u32,
    /// Candidate directions averaged by glossy materials (>= 1)
    pub samples_per_scatter: u32,
    /// Maximum number of scattered bounces after the primary hit
    pub max_ray_depth: u32,
    /// Add analytic point-light shading at every non-terminal hit
    pub enable_direct_lighting: bool,
    /// Render pixel bunches on the rayon pool instead of the calling thread
    pub parallel_enabled: bool,
    /// Pixels per work unit (>= 1)
    pub pixel_bunch_size: usize,
    /// Color returned by rays that leave the scene
    pub background: Color,
    /// Use a white-to-blue sky instead of `background`
    pub use_sky_gradient: bool,
    /// Base seed; every bunch derives its own generator from it
    pub seed: u64,
}

impl Default for RenderProperties {
    fn default() -> Self {
        Self {
            samples_per_pixel: 4,
            samples_per_scatter: 1,
            max_ray_depth: 8,
            enable_direct_lighting: false,
            parallel_enabled: true,
            pixel_bunch_size: DEFAULT_PIXEL_BUNCH_SIZE,
            background: Color::ZERO,
            use_sky_gradient: true,
            seed: 0,
        }
    }
}

impl RenderProperties {
    /// Clamp every setting into its valid range, logging what changed.
    pub fn sanitized(mut self) -> Self {
        if self.samples_per_pixel < 1 {
            log::warn!("samples_per_pixel must be at least 1, using 1");
            self.samples_per_pixel = 1;
        }
        if self.samples_per_scatter < 1 {
            log::warn!("samples_per_scatter must be at least 1, using 1");
            self.samples_per_scatter = 1;
        }
        if self.max_ray_depth > MAX_RAY_DEPTH_LIMIT {
            log::warn!(
                "max_ray_depth {} exceeds the limit, using {}",
                self.max_ray_depth,
                MAX_RAY_DEPTH_LIMIT
            );
            self.max_ray_depth = MAX_RAY_DEPTH_LIMIT;
        }
        if self.pixel_bunch_size < 1 {
            log::warn!("pixel_bunch_size must be at least 1, using 1");
            self.pixel_bunch_size = 1;
        }
        if !self.background.is_finite() {
            log::warn!("background color is not finite, using black");
            self.background = Color::ZERO;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_clamps() {
        let props = RenderProperties {
            samples_per_pixel: 0,
            samples_per_scatter: 0,
            max_ray_depth: 100_000,
            pixel_bunch_size: 0,
            background: Color::splat(f32::NAN),
            ..Default::default()
        }
        .sanitized();

        assert_eq!(props.samples_per_pixel, 1);
        assert_eq!(props.samples_per_scatter, 1);
        assert_eq!(props.max_ray_depth, MAX_RAY_DEPTH_LIMIT);
        assert_eq!(props.pixel_bunch_size, 1);
        assert_eq!(props.background, Color::ZERO);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let props: RenderProperties =
            serde_json::from_str(r#"{ "samples_per_pixel": 32, "enable_direct_lighting": true }"#).unwrap();

        assert_eq!(props.samples_per_pixel, 32);
        assert!(props.enable_direct_lighting);
        assert_eq!(props.max_ray_depth, RenderProperties::default().max_ray_depth);
        assert_eq!(props.pixel_bunch_size, DEFAULT_PIXEL_BUNCH_SIZE);
    }

    #[test]
    fn test_json_roundtrip() {
        let props = RenderProperties {
            background: Color::new(0.1, 0.2, 0.3),
            seed: 99,
            ..Default::default()
        };
        let json = serde_json::to_string(&props).unwrap();
        let back: RenderProperties = serde_json::from_str(&json).unwrap();
        assert_eq!(back, props);
    }
}
