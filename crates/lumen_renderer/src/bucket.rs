//! Pixel-bunch rendering.
//!
//! Divides the image into contiguous runs of pixels (bunches) in row-major
//! order that can be rendered independently and in parallel using rayon.

use lumen_core::Scene;
use lumen_math::Vec4;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::camera::Viewport;
use crate::properties::RenderProperties;
use crate::renderer::{finalize_color, render_pixel};

/// A contiguous run of pixels in the row-major image buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBunch {
    /// Index of this bunch in render order
    pub index: usize,
    /// First pixel (row-major index)
    pub start: usize,
    /// Number of pixels
    pub len: usize,
}

impl PixelBunch {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Split `pixel_count` pixels into bunches of `bunch_size` (the last one may
/// be shorter).
pub fn generate_bunches(pixel_count: usize, bunch_size: usize) -> Vec<PixelBunch> {
    let bunch_size = bunch_size.max(1);
    (0..pixel_count)
        .step_by(bunch_size)
        .enumerate()
        .map(|(index, start)| PixelBunch {
            index,
            start,
            len: bunch_size.min(pixel_count - start),
        })
        .collect()
}

/// Seed for the generator of one bunch.
///
/// Depends only on the base seed and the bunch index, never on which thread
/// picks the bunch up.
pub fn bunch_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Everything a bunch needs to compute its pixels, shared read-only.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub viewport: Viewport,
    pub properties: &'a RenderProperties,
    /// Image width, to map buffer indices back to (x, y)
    pub width: u32,
}

/// Render a single bunch into `out`, which holds exactly its pixels.
pub fn render_bunch(bunch: &PixelBunch, ctx: &RenderContext, out: &mut [Vec4]) {
    debug_assert_eq!(out.len(), bunch.len);
    let mut rng = StdRng::seed_from_u64(bunch_seed(ctx.properties.seed, bunch.index));
    let width = ctx.width.max(1) as usize;

    for (offset, pixel) in out.iter_mut().enumerate() {
        let i = bunch.start + offset;
        let x = (i % width) as u32;
        let y = (i / width) as u32;
        let color = render_pixel(&ctx.viewport, ctx.scene, x, y, ctx.properties, &mut rng);
        *pixel = finalize_color(color);
    }
}

/// Render every bunch of `pixels`, in parallel when enabled.
///
/// Each bunch writes only its own slice of the buffer. Returns the number of
/// bunches rendered.
pub fn render_bunches(ctx: &RenderContext, pixels: &mut [Vec4]) -> usize {
    let bunch_size = ctx.properties.pixel_bunch_size.max(1);
    let bunches = generate_bunches(pixels.len(), bunch_size);

    log::debug!(
        "Rendering {} pixels in {} bunches of {} ({})",
        pixels.len(),
        bunches.len(),
        bunch_size,
        if ctx.properties.parallel_enabled {
            "parallel"
        } else {
            "sequential"
        }
    );

    if ctx.properties.parallel_enabled {
        pixels
            .par_chunks_mut(bunch_size)
            .zip(bunches.par_iter())
            .for_each(|(out, bunch)| render_bunch(bunch, ctx, out));
    } else {
        for (out, bunch) in pixels.chunks_mut(bunch_size).zip(bunches.iter()) {
            render_bunch(bunch, ctx, out);
        }
    }

    bunches.len()
}
