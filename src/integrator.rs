//! Path integrator: follows one camera ray through the scene until it
//! escapes to the sky, is absorbed, or runs out of bounces.

use crate::rtweekend::*;
use serde::Deserialize;

/// Sky dome seen by rays that escape the scene. Blends linearly from
/// `horizon` (straight down) to `zenith` (straight up).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Sky {
    pub horizon: Color,
    pub zenith: Color,
}

impl Default for Sky {
    fn default() -> Self {
        Self {
            horizon: Color::new(1.0, 1.0, 1.0),
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

impl Sky {
    /// Both ends of the gradient must lie inside `[0, 1]` per channel.
    pub fn validate(&self) -> Result<(), RenderError> {
        for (which, color) in [("horizon", self.horizon), ("zenith", self.zenith)] {
            if !(0..3).all(|i| (0.0..=1.0).contains(&color[i])) {
                return Err(RenderError::InvalidSky {
                    which,
                    color: color.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn color(&self, r: &Ray) -> Color {
        let a = match r.dir.try_normalized() {
            Some(unit_direction) => 0.5 * (unit_direction.y + 1.0),
            None => 0.5,
        };
        (1.0 - a) * self.horizon + a * self.zenith
    }
}

/// Radiance arriving along `r`, with at most `depth` surface interactions.
///
/// Runs as a loop carrying the product of attenuations, so stack use does not
/// grow with `depth`.
pub fn ray_color(
    r: &Ray,
    world: &dyn Hittable,
    depth: u32,
    sky: &Sky,
    rng: &mut dyn RngCore,
) -> Color {
    let mut ray = *r;
    let mut throughput = Color::splat(1.0);

    for _ in 0..depth {
        let Some(rec) = world.hit(&ray, Interval::new(T_EPSILON, INFINITY)) else {
            return throughput * sky.color(&ray);
        };
        match rec.mat.scatter(&ray, &rec, rng) {
            Some((scattered, attenuation)) => {
                throughput *= attenuation;
                ray = scattered;
            }
            None => return Color::zero(),
        }
    }

    // Bounce budget exhausted.
    Color::zero()
}
