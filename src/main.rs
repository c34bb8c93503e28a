mod cli;
mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stochastic_rt::config::SceneConfig;
use stochastic_rt::output::save_image;
use stochastic_rt::progress::{POLL_INTERVAL, Progress, Reporter};
use stochastic_rt::render::{FrameBuffer, Partition, Renderer};
use stochastic_rt::rtweekend::stream_rng;
use stochastic_rt::scene;

use cli::Args;
use logger::init_logger;

/// Stream index reserved for laying out the demo scene.
const SCENE_STREAM: u64 = u64::MAX;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let config = match &args.config {
        Some(path) => Some(
            SceneConfig::load(path).with_context(|| format!("failed to load scene {}", path.display()))?,
        ),
        None => None,
    };
    let mut settings = config
        .as_ref()
        .map(SceneConfig::render_settings)
        .unwrap_or_default();
    args.apply_overrides(&mut settings);

    let renderer = Renderer::new(settings).context("invalid render settings")?;
    let aspect_ratio = renderer.settings().aspect_ratio;

    let (world, camera) = match &config {
        Some(config) => (
            config.build_world().context("invalid scene")?,
            config.camera(aspect_ratio).context("invalid camera")?,
        ),
        None => {
            info!("No scene file given, using the demo scene");
            let mut rng = stream_rng(renderer.seed(), SCENE_STREAM);
            (scene::random_scene(&mut rng)?, scene::default_camera(aspect_ratio)?)
        }
    };
    renderer.check_camera(&camera)?;
    info!("Scene has {} objects, camera at {}", world.len(), camera.origin());

    let progress = Arc::new(Progress::new());
    let reporter = Reporter::spawn(progress.clone(), POLL_INTERVAL);

    let image = if args.save_intermediates && renderer.settings().partition == Partition::Samples {
        let partials = renderer.render_partials(&camera, &world, &progress);
        progress.finish();
        save_intermediates(&args.output, &partials)?;
        FrameBuffer::merge(&partials).unwrap_or_else(|| FrameBuffer::new(0, 0))
    } else {
        if args.save_intermediates {
            warn!("--save-intermediates only applies to the samples partition, ignoring");
        }
        let image = renderer.render(&camera, &world, &progress);
        progress.finish();
        image
    };
    reporter.join();

    save_image(&args.output, &image).with_context(|| format!("failed to write {}", args.output.display()))?;
    info!("Done! (seed {})", renderer.seed());
    Ok(())
}

/// Writes each partial frame next to the final output as `intermediate_NN.png`.
fn save_intermediates(output: &Path, partials: &[FrameBuffer]) -> Result<()> {
    let dir = output.parent().map(Path::to_path_buf).unwrap_or_else(PathBuf::new);
    let digits = partials.len().to_string().len();
    for (i, partial) in partials.iter().enumerate() {
        let path = dir.join(format!("intermediate_{:0digits$}.png", i + 1));
        save_image(&path, partial).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}
