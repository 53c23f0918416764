//! Camera: viewport model, motion controls, render settings and pixel buffer.

use std::path::Path;
use std::time::Instant;

use lumen_core::Scene;
use lumen_math::{Quat, Ray, Vec3, Vec4};
use rand::RngCore;

use crate::bucket::{render_bunches, RenderContext};
use crate::gen_f32;
use crate::properties::{RenderProperties, MAX_RAY_DEPTH_LIMIT};
use crate::renderer::{color_to_rgba, RenderStats};

/// Physical height of the viewport rectangle; width follows the aspect ratio.
pub const VIEWPORT_HEIGHT: f32 = 2.0;
/// Distance from the camera center to the viewport plane.
pub const FOCAL_LENGTH: f32 = 1.0;
/// World distance moved per unit of zoom.
pub const ZOOM_STEP: f32 = 0.1;
/// Reference up direction used to derive the basis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Orthonormal camera frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub down: Vec3,
    pub up: Vec3,
}

impl ViewportBasis {
    /// Derive the frame from a viewing direction.
    pub fn from_direction(direction: Vec3) -> Self {
        let forward = direction.try_normalize().unwrap_or(-Vec3::Z);
        let right = forward
            .cross(WORLD_UP)
            .try_normalize()
            // Looking straight up or down: match the frame of a direction
            // tilted slightly towards -Z
            .unwrap_or_else(|| {
                let fallback_up = if forward.y < 0.0 { -Vec3::Z } else { Vec3::Z };
                forward.cross(fallback_up).normalize()
            });
        let down = forward.cross(right);
        Self {
            forward,
            right,
            down,
            up: -down,
        }
    }
}

/// Snapshot of the viewport geometry used to generate primary rays.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    origin: Vec3,
    upper_left: Vec3,
    pixel_delta_right: Vec3,
    pixel_delta_down: Vec3,
}

impl Viewport {
    /// Ray through pixel (x, y). Jittered rays land anywhere in the pixel,
    /// otherwise the ray passes through its center.
    pub fn pixel_ray(&self, x: u32, y: u32, jitter: bool, rng: &mut dyn RngCore) -> Ray {
        let (ox, oy) = if jitter {
            (gen_f32(rng), gen_f32(rng))
        } else {
            (0.5, 0.5)
        };

        let target = self.upper_left
            + (x as f32 + ox) * self.pixel_delta_right
            + (y as f32 + oy) * self.pixel_delta_down;

        Ray::new(self.origin, target - self.origin)
    }
}

/// Pixel count of a `width` x `height` buffer, computed without `u32` overflow.
fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Camera for generating rays into the scene and holding the rendered image.
#[derive(Debug, Clone)]
pub struct Camera {
    center: Vec3,
    direction: Vec3,
    basis: ViewportBasis,

    // Image settings
    width: u32,
    height: u32,
    properties: RenderProperties,

    /// Linear RGBA, clamped to [0, 1], row-major
    pixels: Vec<Vec4>,

    // Rotation requested since the last tick
    queued_yaw: f32,
    queued_pitch: f32,
}

impl Camera {
    /// Create a camera at `center` looking along `direction`.
    pub fn new(center: Vec3, direction: Vec3, resolution: (u32, u32)) -> Self {
        let width = resolution.0.max(1);
        let height = resolution.1.max(1);
        let basis = ViewportBasis::from_direction(direction);

        Self {
            center,
            direction: basis.forward,
            basis,
            width,
            height,
            properties: RenderProperties::default(),
            pixels: vec![Vec4::ZERO; buffer_len(width, height)],
            queued_yaw: 0.0,
            queued_pitch: 0.0,
        }
    }

    /// Replace the render settings.
    pub fn with_properties(mut self, properties: RenderProperties) -> Self {
        self.set_properties(properties);
        self
    }

    // =========================================================================
    // Orientation and motion
    // =========================================================================

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Normalized viewing direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn viewport_basis(&self) -> ViewportBasis {
        self.basis
    }

    /// Translate the camera without changing its orientation.
    pub fn move_by(&mut self, offset: Vec3) {
        self.center += offset;
    }

    /// Turn by `yaw` radians around the up axis and `pitch` radians around
    /// the right axis.
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        if yaw == 0.0 && pitch == 0.0 {
            return;
        }
        let rotation = Quat::from_axis_angle(self.basis.up, yaw) * Quat::from_axis_angle(self.basis.right, pitch);
        self.set_direction(rotation * self.direction);
    }

    /// Add a rotation request; requests are summed until the next tick.
    pub fn queue_rotation(&mut self, yaw: f32, pitch: f32) {
        self.queued_yaw += yaw;
        self.queued_pitch += pitch;
    }

    /// Apply the summed rotation requests once. Returns true if the camera turned.
    pub fn apply_queued_rotation(&mut self) -> bool {
        let (yaw, pitch) = (self.queued_yaw, self.queued_pitch);
        self.queued_yaw = 0.0;
        self.queued_pitch = 0.0;

        if yaw == 0.0 && pitch == 0.0 {
            return false;
        }
        self.rotate(yaw, pitch);
        true
    }

    /// Move along the viewing direction by `amount` zoom steps.
    pub fn zoom(&mut self, amount: f32) {
        self.center += self.basis.forward * amount * ZOOM_STEP;
    }

    fn set_direction(&mut self, direction: Vec3) {
        self.basis = ViewportBasis::from_direction(direction);
        self.direction = self.basis.forward;
    }

    /// Viewport geometry for the current position and resolution.
    pub fn viewport(&self) -> Viewport {
        let aspect = self.width as f32 / self.height as f32;
        let viewport_height = VIEWPORT_HEIGHT;
        let viewport_width = viewport_height * aspect;

        let viewport_right = viewport_width * self.basis.right;
        let viewport_down = viewport_height * self.basis.down;

        Viewport {
            origin: self.center,
            upper_left: self.center + FOCAL_LENGTH * self.basis.forward - viewport_right / 2.0 - viewport_down / 2.0,
            pixel_delta_right: viewport_right / self.width as f32,
            pixel_delta_down: viewport_down / self.height as f32,
        }
    }

    // =========================================================================
    // Resolution and render settings
    // =========================================================================

    pub fn screen_resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Change the output size. The pixel buffer is reallocated (and cleared)
    /// when the size actually changes.
    pub fn set_screen_resolution(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![Vec4::ZERO; buffer_len(width, height)];
    }

    pub fn properties(&self) -> &RenderProperties {
        &self.properties
    }

    pub fn set_properties(&mut self, properties: RenderProperties) {
        self.properties = properties.sanitized();
    }

    pub fn set_samples_per_pixel(&mut self, samples: u32) {
        self.properties.samples_per_pixel = samples.max(1);
    }

    pub fn set_samples_per_scatter(&mut self, samples: u32) {
        self.properties.samples_per_scatter = samples.max(1);
    }

    pub fn set_max_ray_depth(&mut self, depth: u32) {
        self.properties.max_ray_depth = depth.min(MAX_RAY_DEPTH_LIMIT);
    }

    pub fn set_direct_lighting(&mut self, enabled: bool) {
        self.properties.enable_direct_lighting = enabled;
    }

    pub fn set_pixel_bunch_size(&mut self, size: usize) {
        self.properties.pixel_bunch_size = size.max(1);
    }

    pub fn set_parallel_render(&mut self, enabled: bool) {
        self.properties.parallel_enabled = enabled;
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.properties.seed = seed;
    }

    // =========================================================================
    // Rendering and output
    // =========================================================================

    /// Render `scene` into the pixel buffer.
    ///
    /// Blocks until every pixel bunch is finished. The scene and the camera
    /// settings are borrowed for the whole pass, so neither can change mid-render.
    pub fn render(&mut self, scene: &Scene) -> RenderStats {
        let start = Instant::now();
        let ctx = RenderContext {
            scene,
            viewport: self.viewport(),
            properties: &self.properties,
            width: self.width,
        };

        let bunches = render_bunches(&ctx, &mut self.pixels);

        let stats = RenderStats {
            width: self.width,
            height: self.height,
            bunches,
            parallel: self.properties.parallel_enabled,
            elapsed: start.elapsed(),
        };
        log::info!(
            "Rendered {}x{} @ {} spp in {:?} ({} bunches, {})",
            stats.width,
            stats.height,
            self.properties.samples_per_pixel,
            stats.elapsed,
            stats.bunches,
            if stats.parallel { "parallel" } else { "sequential" }
        );
        stats
    }

    /// Color of pixel (x, y), or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The whole buffer, row-major.
    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    /// Gamma-corrected 8-bit RGBA bytes for display.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Copy of the buffer as an `image` RGBA image.
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(color_to_rgba(self.pixels[self.index(x, y)]))
        })
    }

    /// Save the buffer to an image file; the format follows the extension.
    pub fn save_image(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        let path = path.as_ref();
        self.to_image().save(path)?;
        log::info!("Saved {}x{} image to {:?}", self.width, self.height, path);
        Ok(())
    }
}
