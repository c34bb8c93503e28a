use std::io;
use thiserror::Error;

/// Everything that can stop a render from starting or its output from being
/// written. Misses, absorption and total internal reflection are not errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image dimensions must be at least 1x1, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f64),

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    #[error("albedo {0} has a channel outside [0, 1]")]
    InvalidAlbedo(String),

    #[error("fuzz must be a non-negative number, got {0}")]
    InvalidFuzz(f64),

    #[error("refractive index must be positive and finite, got {0}")]
    InvalidRefractiveIndex(f64),

    #[error("material '{name}': {source}")]
    InvalidMaterial {
        name: String,
        #[source]
        source: Box<RenderError>,
    },

    #[error("sky {which} colour {color} has a channel outside [0, 1]")]
    InvalidSky { which: &'static str, color: String },

    #[error("camera aspect ratio {camera} does not match the image aspect ratio {image}")]
    AspectMismatch { camera: f64, image: f64 },

    #[error("sphere #{index}: radius must be non-negative, got {radius}")]
    InvalidRadius { index: usize, radius: f64 },

    #[error("sphere #{index} refers to unknown material '{name}'")]
    UnknownMaterial { index: usize, name: String },

    #[error("unsupported output format '{0}', expected .png or .ppm")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}
