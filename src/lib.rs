//! Offline Monte-Carlo ray tracer for scenes of analytic spheres.
//!
//! Scene setup builds a [`HittableList`](hittable_list::HittableList) and a
//! [`Camera`](camera::Camera); a [`Renderer`](render::Renderer) then turns them
//! into a [`FrameBuffer`](render::FrameBuffer) of tone-mapped pixels.

pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod hittable;
pub mod hittable_list;
pub mod integrator;
pub mod interval;
pub mod material;
pub mod output;
pub mod progress;
pub mod ray;
pub mod render;
pub mod rtweekend;
pub mod scene;
pub mod sphere;
pub mod vec3;
