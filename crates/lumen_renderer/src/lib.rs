//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over a [`lumen_core::Scene`]:
//! - Material scattering (diffuse, metal, glass, emitters)
//! - Optional analytic direct lighting from point lights
//! - A camera/viewport with motion controls and a pixel buffer
//! - Parallel rendering of contiguous pixel bunches with rayon

mod bucket;
mod camera;
mod lighting;
mod properties;
mod renderer;
mod sampling;
mod scatter;

pub use bucket::{bunch_seed, generate_bunches, render_bunch, render_bunches, PixelBunch, RenderContext};
pub use camera::{Camera, Viewport, ViewportBasis, FOCAL_LENGTH, VIEWPORT_HEIGHT, WORLD_UP, ZOOM_STEP};
pub use lighting::direct_lighting;
pub use properties::{RenderProperties, DEFAULT_PIXEL_BUNCH_SIZE, MAX_RAY_DEPTH_LIMIT};
pub use renderer::{color_to_rgba, finalize_color, linear_to_gamma, ray_color, render_pixel, RenderStats};
pub use scatter::{Interaction, Scatter, ScatterResult};

pub(crate) use sampling::gen_f32;

/// Re-export math and scene types used throughout the renderer API
pub use lumen_core::{HitRecord, Scene};
pub use lumen_math::{Color, Ray, Vec3, Vec4};
