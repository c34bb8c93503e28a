use crate::rtweekend::*;

/// Thin-lens camera. Maps normalized image-plane coordinates `(s, t)`, with
/// `(0, 0)` at the lower-left corner and `(1, 1)` at the upper-right, to
/// primary rays.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f64,
    aspect_ratio: f64,
}

impl Camera {
    /// `vfov` is the vertical field of view in degrees. An `aperture` of zero
    /// gives a pinhole camera with everything in focus.
    pub fn new(
        lookfrom: Point3,
        lookat: Point3,
        vup: Vec3,
        vfov: f64,
        aspect_ratio: f64,
        aperture: f64,
        focus_dist: f64,
    ) -> Result<Self, RenderError> {
        if !(vfov > 0.0 && vfov < 180.0) {
            return Err(RenderError::InvalidCamera(format!(
                "vertical field of view must be in (0, 180) degrees, got {vfov}"
            )));
        }
        if !(aspect_ratio > 0.0 && aspect_ratio.is_finite()) {
            return Err(RenderError::InvalidAspectRatio(aspect_ratio));
        }
        if !(aperture >= 0.0 && aperture.is_finite()) {
            return Err(RenderError::InvalidCamera(format!(
                "aperture must be non-negative, got {aperture}"
            )));
        }
        if !(focus_dist > 0.0 && focus_dist.is_finite()) {
            return Err(RenderError::InvalidCamera(format!(
                "focus distance must be positive, got {focus_dist}"
            )));
        }

        let w = (lookfrom - lookat).try_normalized().ok_or_else(|| {
            RenderError::InvalidCamera("look-from and look-at are the same point".into())
        })?;
        let u = vup.cross(w).try_normalized().ok_or_else(|| {
            RenderError::InvalidCamera("up vector is parallel to the view direction".into())
        })?;
        let v = w.cross(u);

        let theta = degrees_to_radians(vfov);
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        let origin = lookfrom;
        let horizontal = focus_dist * viewport_width * u;
        let vertical = focus_dist * viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - focus_dist * w;

        Ok(Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            lens_radius: aperture / 2.0,
            aspect_ratio,
        })
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Width over height of the viewport.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * Vec3::random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::zero()
        };

        let origin = self.origin + offset;
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(origin, target - origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinhole() -> Camera {
        Camera::new(
            Point3::zero(),
            Point3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            90.0,
            2.0,
            0.0,
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn center_ray_looks_at_target() {
        let cam = pinhole();
        let mut rng = stream_rng(1, 0);
        let r = cam.get_ray(0.5, 0.5, &mut rng);
        assert_eq!(r.orig, Point3::zero());
        assert!((r.dir.normalized() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn corners_span_the_viewport() {
        let cam = pinhole();
        let mut rng = stream_rng(1, 0);
        // vfov 90 at focus 1: half-height 1, half-width 2.
        let ll = cam.get_ray(0.0, 0.0, &mut rng);
        assert!((ll.dir - Vec3::new(-2.0, -1.0, -1.0)).length() < 1e-12);
        let ur = cam.get_ray(1.0, 1.0, &mut rng);
        assert!((ur.dir - Vec3::new(2.0, 1.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn lens_rays_all_cross_the_focus_plane_at_one_point() {
        let focus = 5.0;
        let cam = Camera::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            40.0,
            1.0,
            0.5,
            focus,
        )
        .unwrap();
        let mut rng = stream_rng(2, 0);
        let target = cam.get_ray(0.3, 0.7, &mut stream_rng(0, 0));
        let sharp = target.orig + target.dir;

        let mut moved = false;
        for _ in 0..100 {
            let r = cam.get_ray(0.3, 0.7, &mut rng);
            assert!((r.orig - cam.origin()).length() <= 0.25 + 1e-12);
            moved |= r.orig != cam.origin();
            assert!((r.orig + r.dir - sharp).length() < 1e-9);
        }
        assert!(moved);
    }

    #[test]
    fn degenerate_poses_are_rejected() {
        let up = Vec3::new(0.0, 1.0, 0.0);
        let same = Camera::new(Point3::zero(), Point3::zero(), up, 60.0, 1.0, 0.0, 1.0);
        assert!(matches!(same, Err(RenderError::InvalidCamera(_))));

        let parallel = Camera::new(Point3::zero(), Point3::new(0.0, 5.0, 0.0), up, 60.0, 1.0, 0.0, 1.0);
        assert!(matches!(parallel, Err(RenderError::InvalidCamera(_))));

        let fov = Camera::new(Point3::zero(), Point3::new(0.0, 0.0, -1.0), up, 180.0, 1.0, 0.0, 1.0);
        assert!(fov.is_err());

        let aspect = Camera::new(Point3::zero(), Point3::new(0.0, 0.0, -1.0), up, 60.0, 0.0, 0.0, 1.0);
        assert!(matches!(aspect, Err(RenderError::InvalidAspectRatio(_))));

        let aperture = Camera::new(Point3::zero(), Point3::new(0.0, 0.0, -1.0), up, 60.0, 1.0, -0.1, 1.0);
        assert!(aperture.is_err());

        let focus = Camera::new(Point3::zero(), Point3::new(0.0, 0.0, -1.0), up, 60.0, 1.0, 0.1, 0.0);
        assert!(focus.is_err());
    }
}
