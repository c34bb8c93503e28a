use crate::rtweekend::*;
use std::io::{self, Write};

pub type Color = Vec3;

/// Gamma 2 transfer. Non-positive and NaN input map to 0.
#[inline]
pub fn linear_to_gamma(linear_component: f64) -> f64 {
    if linear_component > 0.0 {
        linear_component.sqrt()
    } else {
        0.0
    }
}

/// Quantize a mean linear color to 8 bits per channel.
pub fn to_rgb8(pixel_color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.000, 0.999);
    let mut rgb = [0u8; 3];
    for (channel, byte) in rgb.iter_mut().enumerate() {
        *byte = (256.0 * intensity.clamp(linear_to_gamma(pixel_color[channel]))) as u8;
    }
    rgb
}

/// One PPM text triple.
pub fn write_color<W: Write>(out: &mut W, rgb: [u8; 3]) -> io::Result<()> {
    writeln!(out, "{} {} {}", rgb[0], rgb[1], rgb[2])
}
