//! Lumen command-line renderer.
//!
//! Loads a scene text file, renders it with the CPU path tracer and writes
//! the result as an image.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use lumen_core::{load_scene, Scene};
use lumen_math::Vec3;
use lumen_renderer::{Camera, RenderProperties};

/// lumen - render a scene file with the CPU path tracer
#[derive(Parser, Debug)]
#[command(
    name = "lumen",
    version,
    about = "Render a Lumen scene file to an image",
    after_help = "EXAMPLES:\n  \
                  lumen demos/showcase.scene -o showcase.png\n  \
                  lumen demos/showcase.scene --spp 64 --depth 16 --direct\n  \
                  lumen demos/showcase.scene --eye 0,1,4 --dir 0,-0.2,-1 --config props.json"
)]
struct Cli {
    /// Scene text file to render
    scene: PathBuf,

    /// Output image; the format follows the extension
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Image width in pixels
    #[arg(short = 'W', long, default_value_t = 640)]
    width: u32,

    /// Image height in pixels
    #[arg(short = 'H', long, default_value_t = 360)]
    height: u32,

    /// JSON file with render properties; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Samples per pixel
    #[arg(long)]
    spp: Option<u32>,

    /// Maximum scattered bounces per path
    #[arg(long)]
    depth: Option<u32>,

    /// Directions averaged per glossy scatter
    #[arg(long)]
    scatter: Option<u32>,

    /// Pixels per parallel work unit
    #[arg(long)]
    bunch: Option<usize>,

    /// Add point-light direct lighting
    #[arg(long)]
    direct: bool,

    /// Render on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Camera position as x,y,z
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0", allow_hyphen_values = true)]
    eye: Vec3,

    /// Viewing direction as x,y,z
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,-1", allow_hyphen_values = true)]
    dir: Vec3,
}

fn parse_vec3(s: &str) -> Result<Vec3> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid number in {:?}", s))?;

    match parts.as_slice() {
        [x, y, z] if x.is_finite() && y.is_finite() && z.is_finite() => Ok(Vec3::new(*x, *y, *z)),
        [_, _, _] => bail!("components of {:?} must be finite", s),
        _ => bail!("expected three comma-separated numbers, got {:?}", s),
    }
}

impl Cli {
    /// Render properties from the config file (or defaults) with flag overrides.
    fn properties(&self) -> Result<RenderProperties> {
        let mut props = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {:?}", path))?;
                serde_json::from_str(&text).with_context(|| format!("Failed to parse config {:?}", path))?
            }
            None => RenderProperties::default(),
        };

        if let Some(spp) = self.spp {
            props.samples_per_pixel = spp;
        }
        if let Some(depth) = self.depth {
            props.max_ray_depth = depth;
        }
        if let Some(scatter) = self.scatter {
            props.samples_per_scatter = scatter;
        }
        if let Some(bunch) = self.bunch {
            props.pixel_bunch_size = bunch;
        }
        if let Some(seed) = self.seed {
            props.seed = seed;
        }
        if self.direct {
            props.enable_direct_lighting = true;
        }
        if self.sequential {
            props.parallel_enabled = false;
        }
        Ok(props)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let mut scene = Scene::new();
    let report = load_scene(&cli.scene, &mut scene).with_context(|| format!("Failed to load {:?}", cli.scene))?;
    if !report.is_clean() {
        log::warn!("{} line(s) of {:?} were skipped", report.skipped.len(), cli.scene);
    }
    if scene.primitive_count() == 0 {
        log::warn!("Scene {:?} has no primitives", cli.scene);
    }

    let properties = cli.properties()?;
    log::debug!("Render properties: {:?}", properties);

    let mut camera = Camera::new(cli.eye, cli.dir, (cli.width, cli.height)).with_properties(properties);
    camera.render(&scene);

    camera
        .save_image(&cli.output)
        .with_context(|| format!("Failed to write {:?}", cli.output))?;

    Ok(())
}
