//! Built-in demo scene: a field of small random spheres around three large
//! ones on a huge ground sphere.

use crate::rtweekend::*;

/// Builds the demo world. The layout depends only on `rng`.
pub fn random_scene<R: Rng + ?Sized>(rng: &mut R) -> Result<HittableList, RenderError> {
    let mut world = HittableList::new();

    let ground_material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))?);
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground_material,
    )));

    // Every glass marble shares one material.
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5)?);

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = random_f64(rng);
            let center = Point3::new(
                a as f64 + 0.9 * random_f64(rng),
                0.2,
                b as f64 + 0.9 * random_f64(rng),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let sphere_material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = Color::random(rng) * Color::random(rng);
                Arc::new(Lambertian::new(albedo)?)
            } else if choose_mat < 0.95 {
                let albedo = Color::random_interval(rng, 0.5, 1.0);
                let fuzz = random_f64_range(rng, 0.0, 0.5);
                Arc::new(Metal::new(albedo, fuzz)?)
            } else {
                glass.clone()
            };
            world.add(Arc::new(Sphere::new(center, 0.2, sphere_material)));
        }
    }

    world.add(Arc::new(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, glass)));

    let material2 = Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))?);
    world.add(Arc::new(Sphere::new(Point3::new(-4.0, 1.0, 0.0), 1.0, material2)));

    let material3 = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)?);
    world.add(Arc::new(Sphere::new(Point3::new(4.0, 1.0, 0.0), 1.0, material3)));

    Ok(world)
}

/// Camera framing [`random_scene`].
pub fn default_camera(aspect_ratio: f64) -> Result<Camera, RenderError> {
    Camera::new(
        Point3::new(13.0, 2.0, 3.0),
        Point3::zero(),
        Vec3::new(0.0, 1.0, 0.0),
        20.0,
        aspect_ratio,
        0.1,
        10.0,
    )
}
