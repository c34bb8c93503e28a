use crate::rtweekend::*;

/// Surface response to an incoming ray.
pub trait Material: Send + Sync {
    /// Outgoing ray and its attenuation, or `None` when the ray is absorbed.
    fn scatter(&self, r_in: &Ray, rec: &HitRecord<'_>, rng: &mut dyn RngCore) -> Option<(Ray, Color)>;
}

/// Attenuation must keep every channel inside `[0, 1]`.
fn check_albedo(albedo: Color) -> Result<(), RenderError> {
    if (0..3).all(|i| (0.0..=1.0).contains(&albedo[i])) {
        Ok(())
    } else {
        Err(RenderError::InvalidAlbedo(albedo.to_string()))
    }
}

/// Diffuse reflector.
///
/// Directions are cosine-weighted about the normal: `normal + random unit
/// vector`.
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Result<Self, RenderError> {
        check_albedo(albedo)?;
        Ok(Self { albedo })
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }
}

impl Material for Lambertian {
    fn scatter(&self, _r_in: &Ray, rec: &HitRecord<'_>, rng: &mut dyn RngCore) -> Option<(Ray, Color)> {
        let mut scatter_direction = rec.normal + Vec3::random_unit_vector(rng);
        if scatter_direction.near_zero() {
            scatter_direction = rec.normal;
        }
        let scattered = Ray::new(rec.p, scatter_direction);
        Some((scattered, self.albedo))
    }
}

/// Mirror with a fuzzed lobe.
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Fuzz above 1 is clamped to 1. Negative or NaN fuzz is rejected.
    pub fn new(albedo: Color, fuzz: f64) -> Result<Self, RenderError> {
        check_albedo(albedo)?;
        if fuzz.is_nan() || fuzz < 0.0 {
            return Err(RenderError::InvalidFuzz(fuzz));
        }
        Ok(Self {
            albedo,
            fuzz: fuzz.min(1.0),
        })
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(&self, r_in: &Ray, rec: &HitRecord<'_>, rng: &mut dyn RngCore) -> Option<(Ray, Color)> {
        let mut reflected = Vec3::reflect(&r_in.dir.normalized(), &rec.normal);
        if self.fuzz > 0.0 {
            reflected += self.fuzz * Vec3::random_unit_vector(rng);
        }
        // A lobe dipping under the surface is absorbed.
        if reflected.dot(rec.normal) <= 0.0 {
            return None;
        }
        Some((Ray::new(rec.p, reflected), self.albedo))
    }
}

/// Clear refractive material such as glass or water.
pub struct Dielectric {
    refraction_index: f64,
}

impl Dielectric {
    pub fn new(refraction_index: f64) -> Result<Self, RenderError> {
        if !(refraction_index > 0.0 && refraction_index.is_finite()) {
            return Err(RenderError::InvalidRefractiveIndex(refraction_index));
        }
        Ok(Self { refraction_index })
    }

    pub fn refraction_index(&self) -> f64 {
        self.refraction_index
    }

    /// Schlick's approximation of Fresnel reflectance.
    fn reflectance(cosine: f64, refraction_index: f64) -> f64 {
        let r0 = (1.0 - refraction_index) / (1.0 + refraction_index);
        let r0 = r0 * r0;
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, r_in: &Ray, rec: &HitRecord<'_>, rng: &mut dyn RngCore) -> Option<(Ray, Color)> {
        let ri = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = r_in.dir.normalized();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = ri * sin_theta > 1.0;
        let direction = if cannot_refract || Self::reflectance(cos_theta, ri) > random_f64(rng) {
            Vec3::reflect(&unit_direction, &rec.normal)
        } else {
            Vec3::refract(&unit_direction, &rec.normal, ri)
        };

        Some((Ray::new(rec.p, direction), Color::splat(1.0)))
    }
}
