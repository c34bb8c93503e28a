//! TOML description of a render: image settings, camera pose, sky, named
//! materials and the spheres that use them.

use crate::render::{Partition, RenderSettings};
use crate::rtweekend::*;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    #[serde(default)]
    pub image: ImageConfig,
    pub camera: CameraConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub sky: Sky,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialConfig>,
    #[serde(default)]
    pub spheres: Vec<SphereConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    pub width: u32,
    pub aspect_ratio: f64,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        let defaults = RenderSettings::default();
        Self {
            width: defaults.image_width,
            aspect_ratio: defaults.aspect_ratio,
            samples_per_pixel: defaults.samples_per_pixel,
            max_depth: defaults.max_depth,
        }
    }
}

fn default_up() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    pub look_from: Point3,
    pub look_at: Point3,
    #[serde(default = "default_up")]
    pub up: Vec3,
    pub vfov: f64,
    #[serde(default)]
    pub aperture: f64,
    /// Defaults to the distance between `look_from` and `look_at`.
    pub focus_distance: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub seed: Option<u64>,
    pub threads: Option<usize>,
    pub partition: Partition,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaterialConfig {
    Lambertian {
        albedo: Color,
    },
    Metal {
        albedo: Color,
        #[serde(default)]
        fuzz: f64,
    },
    Dielectric {
        refractive_index: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SphereConfig {
    pub center: Point3,
    pub radius: f64,
    pub material: String,
}

impl MaterialConfig {
    /// Builds the material, tagging any parameter error with `name`.
    pub fn build(&self, name: &str) -> Result<Arc<dyn Material>, RenderError> {
        let material: Result<Arc<dyn Material>, RenderError> = match *self {
            MaterialConfig::Lambertian { albedo } => {
                Lambertian::new(albedo).map(|m| Arc::new(m) as Arc<dyn Material>)
            }
            MaterialConfig::Metal { albedo, fuzz } => {
                Metal::new(albedo, fuzz).map(|m| Arc::new(m) as Arc<dyn Material>)
            }
            MaterialConfig::Dielectric { refractive_index } => {
                Dielectric::new(refractive_index).map(|m| Arc::new(m) as Arc<dyn Material>)
            }
        };
        material.map_err(|source| RenderError::InvalidMaterial {
            name: name.to_string(),
            source: Box::new(source),
        })
    }
}

impl SceneConfig {
    pub fn from_toml(text: &str) -> Result<Self, RenderError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        debug!(
            "loaded {} ({} materials, {} spheres)",
            path.display(),
            config.materials.len(),
            config.spheres.len()
        );
        Ok(config)
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            image_width: self.image.width,
            aspect_ratio: self.image.aspect_ratio,
            samples_per_pixel: self.image.samples_per_pixel,
            max_depth: self.image.max_depth,
            seed: self.render.seed,
            threads: self.render.threads,
            partition: self.render.partition,
            sky: self.sky,
        }
    }

    pub fn camera(&self, aspect_ratio: f64) -> Result<Camera, RenderError> {
        let cam = &self.camera;
        let focus_distance = cam
            .focus_distance
            .unwrap_or_else(|| (cam.look_from - cam.look_at).length());
        Camera::new(
            cam.look_from,
            cam.look_at,
            cam.up,
            cam.vfov,
            aspect_ratio,
            cam.aperture,
            focus_distance,
        )
    }

    /// Instantiates every material once and every sphere with a shared handle
    /// to its material. Fails on the first invalid entry.
    pub fn build_world(&self) -> Result<HittableList, RenderError> {
        let mut materials: BTreeMap<&str, Arc<dyn Material>> = BTreeMap::new();
        for (name, material) in &self.materials {
            materials.insert(name, material.build(name)?);
        }

        let mut world = HittableList::new();
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !(sphere.radius >= 0.0 && sphere.radius.is_finite()) {
                return Err(RenderError::InvalidRadius {
                    index,
                    radius: sphere.radius,
                });
            }
            let mat = materials
                .get(sphere.material.as_str())
                .ok_or_else(|| RenderError::UnknownMaterial {
                    index,
                    name: sphere.material.clone(),
                })?;
            world.add(Arc::new(Sphere::new(sphere.center, sphere.radius, mat.clone())));
        }
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"
[image]
width = 64
aspect_ratio = 2.0
samples_per_pixel = 8
max_depth = 5

[camera]
look_from = [0.0, 0.0, 0.0]
look_at = [0.0, 0.0, -1.0]
vfov = 90.0

[render]
seed = 42
partition = "samples"

[sky]
zenith = [0.1, 0.2, 0.9]

[materials.ground]
type = "lambertian"
albedo = [0.5, 0.5, 0.5]

[materials.mirror]
type = "metal"
albedo = [0.8, 0.8, 0.8]
fuzz = 0.1

[materials.glass]
type = "dielectric"
refractive_index = 1.5

[[spheres]]
center = [0.0, -100.5, -1.0]
radius = 100.0
material = "ground"

[[spheres]]
center = [0.0, 0.0, -1.0]
radius = 0.5
material = "glass"

[[spheres]]
center = [1.0, 0.0, -1.0]
radius = 0.5
material = "mirror"
"#;

    #[test]
    fn parses_full_scene() {
        let config = SceneConfig::from_toml(SCENE).unwrap();
        let settings = config.render_settings();
        assert_eq!(settings.image_width, 64);
        assert_eq!(settings.image_height(), 32);
        assert_eq!(settings.samples_per_pixel, 8);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.partition, Partition::Samples);
        assert_eq!(settings.threads, None);
        assert_eq!(settings.sky.zenith, Color::new(0.1, 0.2, 0.9));
        assert_eq!(settings.sky.horizon, Sky::default().horizon);

        assert_eq!(
            config.materials["mirror"],
            MaterialConfig::Metal {
                albedo: Color::splat(0.8),
                fuzz: 0.1
            }
        );
        let world = config.build_world().unwrap();
        assert_eq!(world.len(), 3);
        assert!(config.camera(settings.aspect_ratio).is_ok());
    }

    #[test]
    fn minimal_scene_uses_defaults() {
        let config = SceneConfig::from_toml(
            r#"
[camera]
look_from = [0.0, 0.0, 3.0]
look_at = [0.0, 0.0, 0.0]
vfov = 40.0
"#,
        )
        .unwrap();
        let settings = config.render_settings();
        assert_eq!(settings, RenderSettings::default());
        assert!(config.build_world().unwrap().is_empty());
        assert_eq!(config.camera.up, Vec3::new(0.0, 1.0, 0.0));
        assert!(config.camera(1.5).is_ok());
    }

    #[test]
    fn unknown_material_reference_is_an_error() {
        let text = SCENE.replace("material = \"mirror\"", "material = \"chrome\"");
        let err = SceneConfig::from_toml(&text).unwrap().build_world().unwrap_err();
        assert!(matches!(err, RenderError::UnknownMaterial { index: 2, ref name } if name == "chrome"));
    }

    #[test]
    fn out_of_range_material_parameters_are_errors() {
        let text = SCENE.replace("fuzz = 0.1", "fuzz = -0.5");
        let err = SceneConfig::from_toml(&text).unwrap().build_world().unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidMaterial { ref name, ref source }
                if name == "mirror" && matches!(**source, RenderError::InvalidFuzz(_))
        ));

        let text = SCENE.replace("refractive_index = 1.5", "refractive_index = -1.5");
        let err = SceneConfig::from_toml(&text).unwrap().build_world().unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidMaterial { ref source, .. }
                if matches!(**source, RenderError::InvalidRefractiveIndex(_))
        ));
        assert!(err.to_string().starts_with("material 'glass'"));

        let text = SCENE.replace("albedo = [0.5, 0.5, 0.5]", "albedo = [1.5, 0.5, 0.5]");
        let err = SceneConfig::from_toml(&text).unwrap().build_world().unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidMaterial { ref source, .. } if matches!(**source, RenderError::InvalidAlbedo(_))
        ));

        let text = SCENE.replace("radius = 0.5\nmaterial = \"glass\"", "radius = -0.5\nmaterial = \"glass\"");
        let err = SceneConfig::from_toml(&text).unwrap().build_world().unwrap_err();
        assert!(matches!(err, RenderError::InvalidRadius { index: 1, .. }));
    }

    #[test]
    fn large_fuzz_is_accepted_and_clamped() {
        let m = MaterialConfig::Metal {
            albedo: Color::splat(0.5),
            fuzz: 4.0,
        };
        assert!(m.build("rough").is_ok());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(matches!(
            SceneConfig::from_toml("[camera]\nlook_from = 3"),
            Err(RenderError::Config(_))
        ));
        assert!(matches!(
            SceneConfig::from_toml(&SCENE.replace("type = \"metal\"", "type = \"plastic\"")),
            Err(RenderError::Config(_))
        ));
    }

    #[test]
    fn out_of_range_sky_is_rejected_before_rendering() {
        let text = SCENE.replace("zenith = [0.1, 0.2, 0.9]", "zenith = [0.1, 2.0, 0.9]");
        let settings = SceneConfig::from_toml(&text).unwrap().render_settings();
        assert!(matches!(
            settings.validate(),
            Err(RenderError::InvalidSky { which: "zenith", .. })
        ));
    }

    #[test]
    fn focus_distance_defaults_to_target_distance() {
        let config = SceneConfig::from_toml(SCENE).unwrap();
        assert_eq!(config.camera.focus_distance, None);
        let mut rng = stream_rng(0, 0);
        let cam = config.camera(2.0).unwrap();
        let r = cam.get_ray(0.5, 0.5, &mut rng);
        assert!((r.dir - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
    }
}
