//! Parallel render scheduler.
//!
//! Two ways of splitting the work are supported:
//!
//! * [`Partition::Rows`] hands disjoint rows of one shared frame buffer to the
//!   rayon pool. Each row draws from its own random stream.
//! * [`Partition::Samples`] gives every worker the whole frame and a share of
//!   the sample budget, then averages the partial frames.
//!
//! Streams are derived from the render seed and the row or worker index, so a
//! fixed seed reproduces the image byte for byte. For the sample partition the
//! worker count is part of that key.

use crate::color::to_rgb8;
use crate::progress::Progress;
use crate::rtweekend::*;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Deserialize;
use std::time::Instant;

pub const CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    #[default]
    Rows,
    Samples,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub image_width: u32,
    pub aspect_ratio: f64,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    /// `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
    /// `None` sizes the pool to the machine.
    pub threads: Option<usize>,
    pub partition: Partition,
    pub sky: Sky,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            image_width: 400,
            aspect_ratio: 3.0 / 2.0,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: None,
            threads: None,
            partition: Partition::default(),
            sky: Sky::default(),
        }
    }
}

impl RenderSettings {
    pub fn image_height(&self) -> u32 {
        (self.image_width as f64 / self.aspect_ratio) as u32
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return Err(RenderError::InvalidAspectRatio(self.aspect_ratio));
        }
        let height = self.image_height();
        if self.image_width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.image_width,
                height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::ZeroSamples);
        }
        self.sky.validate()
    }
}

/// Row-major grid of mean linear colors. Row 0 is the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    samples: u32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: 0,
            pixels: vec![Color::zero(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples averaged into every pixel.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Mean of all pixels, per channel.
    pub fn mean(&self) -> Color {
        let sum = self.pixels.iter().fold(Color::zero(), |acc, &c| acc + c);
        sum / self.pixels.len().max(1) as f64
    }

    /// Gamma-corrected 8-bit RGB, top row first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * CHANNELS);
        for &color in &self.pixels {
            bytes.extend_from_slice(&to_rgb8(color));
        }
        bytes
    }

    /// As [`FrameBuffer::to_rgb8`] but bottom row first.
    pub fn to_rgb8_flipped(&self) -> Vec<u8> {
        let stride = self.width as usize * CHANNELS;
        let rows = self.to_rgb8();
        let mut bytes = Vec::with_capacity(rows.len());
        for row in rows.chunks(stride.max(1)).rev() {
            bytes.extend_from_slice(row);
        }
        bytes
    }

    /// Sample-weighted mean of partial renders of the same frame. With equal
    /// shares this is the plain per-channel mean.
    pub fn merge(partials: &[FrameBuffer]) -> Option<FrameBuffer> {
        let first = partials.first()?;
        let mut merged = FrameBuffer::new(first.width, first.height);
        let total: u32 = partials.iter().map(|p| p.samples).sum();
        if total == 0 {
            return Some(merged);
        }

        for partial in partials {
            debug_assert_eq!((partial.width, partial.height), (first.width, first.height));
            let weight = partial.samples as f64;
            for (acc, &c) in merged.pixels.iter_mut().zip(&partial.pixels) {
                *acc += c * weight;
            }
        }
        let scale = 1.0 / total as f64;
        for acc in merged.pixels.iter_mut() {
            *acc *= scale;
        }
        merged.samples = total;
        Some(merged)
    }
}

/// Hardware threads available to this process, falling back to the logical
/// CPU count and then to one.
pub fn detect_parallelism() -> usize {
    match std::thread::available_parallelism() {
        Ok(n) => n.get(),
        Err(err) => {
            warn!("available_parallelism failed ({err}), falling back to num_cpus");
            num_cpus::get().max(1)
        }
    }
}

/// Splits `total` samples across at most `workers` workers. Shares differ by
/// at most one and sum to `total`; no share is zero.
pub fn sample_shares(total: u32, workers: usize) -> Vec<u32> {
    let n = workers.clamp(1, total.max(1) as usize) as u32;
    let base = total / n;
    let extra = total % n;
    (0..n).map(|w| base + u32::from(w < extra)).collect()
}

pub struct Renderer {
    settings: RenderSettings,
    image_height: u32,
    seed: u64,
    workers: usize,
}

impl Renderer {
    /// Checks the settings and fixes the seed and pool size. Nothing is
    /// rendered with invalid settings.
    pub fn new(settings: RenderSettings) -> Result<Self, RenderError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let workers = settings
            .threads
            .filter(|&n| n > 0)
            .unwrap_or_else(detect_parallelism);
        Ok(Self {
            image_height: settings.image_height(),
            settings,
            seed,
            workers,
        })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Fails when the camera viewport would be stretched onto the image.
    pub fn check_camera(&self, camera: &Camera) -> Result<(), RenderError> {
        let image = self.settings.aspect_ratio;
        if (camera.aspect_ratio() - image).abs() > 1e-9 * image {
            return Err(RenderError::AspectMismatch {
                camera: camera.aspect_ratio(),
                image,
            });
        }
        Ok(())
    }

    pub fn render(&self, camera: &Camera, world: &dyn Hittable, progress: &Progress) -> FrameBuffer {
        if let Err(err) = self.check_camera(camera) {
            warn!("{err}, the image will be stretched");
        }
        match self.settings.partition {
            Partition::Rows => self.render_rows(camera, world, progress),
            Partition::Samples => {
                let partials = self.render_partials(camera, world, progress);
                let start = Instant::now();
                let merged = FrameBuffer::merge(&partials)
                    .unwrap_or_else(|| FrameBuffer::new(self.settings.image_width, self.image_height));
                debug!("merged {} partial frames in {:.2?}", partials.len(), start.elapsed());
                merged
            }
        }
    }

    /// One full frame per worker, each with its share of the sample budget.
    pub fn render_partials(
        &self,
        camera: &Camera,
        world: &dyn Hittable,
        progress: &Progress,
    ) -> Vec<FrameBuffer> {
        let (width, height) = (self.settings.image_width, self.image_height);
        let shares = sample_shares(self.settings.samples_per_pixel, self.workers);
        progress.start(height as u64 * shares.len() as u64);
        self.log_start(shares.len());

        let start = Instant::now();
        let partials: Vec<FrameBuffer> = with_thread_pool(self.workers, || {
            shares
                .par_iter()
                .enumerate()
                .map(|(worker, &samples)| {
                    let mut rng = stream_rng(self.seed, worker as u64);
                    let mut partial = FrameBuffer::new(width, height);
                    partial.samples = samples;
                    for (j, row) in partial.pixels.chunks_mut(width as usize).enumerate() {
                        self.render_row(camera, world, j as u32, samples, &mut rng, row);
                        progress.row_done();
                    }
                    debug!("worker {worker} finished with {samples} samples per pixel");
                    partial
                })
                .collect()
        });
        info!("Rendered {} partial frames in {:.2?}", partials.len(), start.elapsed());
        partials
    }

    fn render_rows(&self, camera: &Camera, world: &dyn Hittable, progress: &Progress) -> FrameBuffer {
        let (width, height) = (self.settings.image_width, self.image_height);
        let samples = self.settings.samples_per_pixel;
        progress.start(height as u64);
        self.log_start(self.workers);

        let start = Instant::now();
        let mut image = FrameBuffer::new(width, height);
        image.samples = samples;
        with_thread_pool(self.workers, || {
            image
                .pixels
                .par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(j, row)| {
                    let mut rng = stream_rng(self.seed, j as u64);
                    self.render_row(camera, world, j as u32, samples, &mut rng, row);
                    progress.row_done();
                });
        });
        info!("Image rendered in {:.2?}", start.elapsed());
        image
    }

    /// Mean color of `samples` jittered paths for every pixel of row `j`.
    fn render_row(
        &self,
        camera: &Camera,
        world: &dyn Hittable,
        j: u32,
        samples: u32,
        rng: &mut RenderRng,
        row: &mut [Color],
    ) {
        let width = self.settings.image_width as f64;
        let height = self.image_height as f64;
        // Row 0 is the top, camera t = 0 is the bottom.
        let flipped = (self.image_height - 1 - j) as f64;
        let scale = 1.0 / samples.max(1) as f64;

        for (i, pixel) in row.iter_mut().enumerate() {
            let mut pixel_color = Color::zero();
            for _ in 0..samples {
                let s = (i as f64 + random_f64(rng)) / width;
                let t = (flipped + random_f64(rng)) / height;
                let r = camera.get_ray(s, t, rng);
                pixel_color += ray_color(&r, world, self.settings.max_depth, &self.settings.sky, rng);
            }
            *pixel = pixel_color * scale;
        }
    }

    fn log_start(&self, units: usize) {
        info!(
            "Rendering {}x{} at {} samples/pixel, max depth {}, {:?} partition over {} units on {} threads (seed {})",
            self.settings.image_width,
            self.image_height,
            self.settings.samples_per_pixel,
            self.settings.max_depth,
            self.settings.partition,
            units,
            self.workers,
            self.seed
        );
    }
}

/// Runs `f` inside a pool of `threads` workers. If the pool cannot be built
/// the work runs on the calling thread.
fn with_thread_pool<T: Send>(threads: usize, f: impl FnOnce() -> T + Send) -> T {
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(f),
        Err(err) => {
            warn!("could not build a {threads}-thread pool ({err}), rendering on the current thread");
            f()
        }
    }
}
