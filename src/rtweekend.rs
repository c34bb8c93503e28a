pub use crate::camera::Camera;
pub use crate::color::{Color, linear_to_gamma};
pub use crate::error::RenderError;
pub use crate::hittable::{HitRecord, Hittable};
pub use crate::hittable_list::HittableList;
pub use crate::integrator::{Sky, ray_color};
pub use crate::interval::Interval;
pub use crate::material::{Dielectric, Lambertian, Material, Metal};
pub use crate::ray::Ray;
pub use crate::sphere::Sphere;
pub use crate::vec3::{Point3, Vec3};

pub use rand::{Rng, RngCore, SeedableRng};
pub use std::sync::Arc;

/// Random stream owned by one unit of render work.
pub type RenderRng = rand_chacha::ChaCha8Rng;

pub const INFINITY: f64 = f64::INFINITY;
pub const PI: f64 = std::f64::consts::PI;

/// Offset applied to the start of every traced interval to keep a scattered
/// ray from hitting the surface it leaves.
pub const T_EPSILON: f64 = 0.001;

#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

#[inline]
pub fn random_f64<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

#[inline]
pub fn random_f64_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + (max - min) * random_f64(rng)
}

/// SplitMix64 finaliser over `base ^ index`. Neighbouring indices give
/// unrelated seeds.
pub fn stream_seed(base: u64, index: u64) -> u64 {
    let mut z = base ^ index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Independent stream number `index` derived from a render's base seed.
pub fn stream_rng(base: u64, index: u64) -> RenderRng {
    RenderRng::seed_from_u64(stream_seed(base, index))
}
