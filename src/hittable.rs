use crate::rtweekend::*;

#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    pub p: Point3,
    /// Unit length, always opposing the incoming ray.
    pub normal: Vec3,
    pub t: f64,
    pub mat: &'a dyn Material,
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Builds a record from the geometric outward normal, flipping it to face
    /// the ray when the ray arrives from inside.
    pub fn new(r: &Ray, t: f64, outward_normal: Vec3, mat: &'a dyn Material) -> Self {
        let mut rec = Self {
            p: r.at(t),
            normal: outward_normal,
            t,
            mat,
            front_face: true,
        };
        rec.set_face_normal(r, outward_normal);
        rec
    }

    #[inline]
    pub fn set_face_normal(&mut self, r: &Ray, outward_normal: Vec3) {
        self.front_face = r.dir.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

pub trait Hittable: Send + Sync {
    /// Nearest intersection with parameter inside `ray_t`, if any.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}
