use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use stochastic_rt::render::{Partition, RenderSettings};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PartitionArg {
    /// Disjoint rows of one shared image
    Rows,
    /// Whole image per worker with a share of the samples, averaged at the end
    Samples,
}

impl From<PartitionArg> for Partition {
    fn from(arg: PartitionArg) -> Self {
        match arg {
            PartitionArg::Rows => Partition::Rows,
            PartitionArg::Samples => Partition::Samples,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "stochastic_rt")]
#[command(about = "Render a sphere scene with Monte-Carlo path tracing")]
pub struct Args {
    /// Scene file (TOML). The built-in demo scene is used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file, .png or .ppm
    #[arg(short, long, default_value = "result.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(short = 's', long)]
    pub samples: Option<u32>,

    /// Maximum bounces per path
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for a reproducible image
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads (defaults to the available parallelism)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// How work is split across workers
    #[arg(long, value_enum)]
    pub partition: Option<PartitionArg>,

    /// With the samples partition, also write each worker's image as intermediate_NN.png
    #[arg(long)]
    pub save_intermediates: bool,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Command line values take precedence over the scene file.
    pub fn apply_overrides(&self, settings: &mut RenderSettings) {
        if let Some(width) = self.width {
            settings.image_width = width;
        }
        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(depth) = self.max_depth {
            settings.max_depth = depth;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.threads.is_some() {
            settings.threads = self.threads;
        }
        if let Some(partition) = self.partition {
            settings.partition = partition.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_values() {
        let args = Args::parse_from(["stochastic_rt", "--samples", "12", "--partition", "samples", "-j", "3"]);
        let mut settings = RenderSettings {
            seed: Some(5),
            ..RenderSettings::default()
        };
        args.apply_overrides(&mut settings);
        assert_eq!(settings.samples_per_pixel, 12);
        assert_eq!(settings.partition, Partition::Samples);
        assert_eq!(settings.threads, Some(3));
        assert_eq!(settings.seed, Some(5));
        assert_eq!(settings.image_width, RenderSettings::default().image_width);
    }

    #[test]
    fn defaults() {
        let args = Args::parse_from(["stochastic_rt"]);
        assert!(args.config.is_none());
        assert_eq!(args.output, PathBuf::from("result.png"));
        assert!(!args.save_intermediates);
    }
}
