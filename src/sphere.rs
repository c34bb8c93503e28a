use crate::rtweekend::*;

pub struct Sphere {
    center: Point3,
    radius: f64,
    mat: Arc<dyn Material>,
}

impl Sphere {
    /// Negative radii are clamped to zero; a zero-radius sphere is never hit.
    pub fn new(center: Point3, radius: f64, mat: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            mat,
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if self.radius <= 0.0 {
            return None;
        }

        let oc = self.center - r.orig;
        let a = r.dir.length_squared();
        if a == 0.0 {
            return None;
        }
        let h = r.dir.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Nearest root first.
        let mut root = (h - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (h + sqrtd) / a;
            if !ray_t.contains(root) {
                return None;
            }
        }

        let outward_normal = (r.at(root) - self.center) / self.radius;
        Some(HitRecord::new(r, root, outward_normal, self.mat.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere {
        Sphere::new(
            Point3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::new(Color::splat(0.5)).unwrap()),
        )
    }

    #[test]
    fn ray_down_negative_z_hits_at_half() {
        let s = unit_sphere();
        let r = Ray::new(Point3::zero(), Vec3::new(0.0, 0.0, -1.0));
        let rec = s.hit(&r, Interval::new(T_EPSILON, INFINITY)).expect("hit");
        assert!((rec.t - 0.5).abs() < 1e-12);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn miss_is_none() {
        let s = unit_sphere();
        let r = Ray::new(Point3::zero(), Vec3::new(0.0, 1.0, 0.0));
        assert!(s.hit(&r, Interval::new(T_EPSILON, INFINITY)).is_none());
    }

    #[test]
    fn far_root_is_used_when_near_root_is_outside_interval() {
        let s = unit_sphere();
        let r = Ray::new(Point3::zero(), Vec3::new(0.0, 0.0, -1.0));
        let rec = s.hit(&r, Interval::new(0.6, INFINITY)).expect("hit");
        assert!((rec.t - 1.5).abs() < 1e-12);
        assert!(!rec.front_face);
    }

    #[test]
    fn interval_upper_bound_rejects_both_roots() {
        let s = unit_sphere();
        let r = Ray::new(Point3::zero(), Vec3::new(0.0, 0.0, -1.0));
        assert!(s.hit(&r, Interval::new(T_EPSILON, 0.4)).is_none());
    }

    #[test]
    fn hit_point_does_not_depend_on_direction_length() {
        let s = unit_sphere();
        let dir = Vec3::new(0.1, -0.05, -1.0);
        let unit = s
            .hit(&Ray::new(Point3::zero(), dir), Interval::new(T_EPSILON, INFINITY))
            .expect("hit");
        for scale in [0.25, 3.0, 1000.0] {
            let scaled = s
                .hit(
                    &Ray::new(Point3::zero(), dir * scale),
                    Interval::new(T_EPSILON / scale, INFINITY),
                )
                .expect("hit");
            assert!((scaled.p - unit.p).length() < 1e-9);
            assert!((scaled.normal - unit.normal).length() < 1e-9);
            assert!((scaled.t * scale - unit.t).abs() < 1e-9);
        }
    }

    #[test]
    fn normal_opposes_ray_from_inside_and_outside() {
        let s = unit_sphere();
        let mut rng = stream_rng(11, 0);
        for _ in 0..200 {
            let origin = Vec3::random_interval(&mut rng, -2.0, 2.0);
            let dir = Vec3::random_unit_vector(&mut rng);
            let r = Ray::new(origin, dir);
            if let Some(rec) = s.hit(&r, Interval::new(T_EPSILON, INFINITY)) {
                assert!(rec.normal.dot(r.dir) <= 0.0);
                assert!((rec.normal.length() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn zero_radius_and_zero_direction_never_hit() {
        let mat: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)).unwrap());
        let point = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.0, mat.clone());
        let r = Ray::new(Point3::zero(), Vec3::new(0.0, 0.0, -1.0));
        assert!(point.hit(&r, Interval::new(-INFINITY, INFINITY)).is_none());

        let negative = Sphere::new(Point3::zero(), -2.0, mat);
        assert_eq!(negative.radius(), 0.0);

        let stuck = Ray::new(Point3::zero(), Vec3::zero());
        assert!(unit_sphere().hit(&stuck, Interval::new(-INFINITY, INFINITY)).is_none());
    }
}
