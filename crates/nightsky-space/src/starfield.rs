//! Static star field: thousands of small blue-violet stars sampled through a
//! sphere and rotated slowly as one group, plus a handful of larger bright
//! stars registered on their own.

use glam::Vec3;
use nightsky_config::{ConfigError, StarFieldConfig};
use nightsky_render::{
    Blending, ObjectHandle, PointCloudDesc, PointVertex, SceneHost, SphereDesc,
};
use rand::Rng;

use crate::color::{Hsl, lerp};
use crate::sampling::sample_in_sphere;
use crate::sky::{Animate, advance_rotation};

/// Hue band shared by regular and bright stars.
const STAR_HUE: std::ops::Range<f32> = 0.6..0.7;
const STAR_SATURATION: std::ops::Range<f32> = 0.7..1.0;
const STAR_LIGHTNESS: std::ops::Range<f32> = 0.6..1.0;

/// A regular star. Never mutated after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticStar {
    pub position: Vec3,
    pub color: Hsl,
    pub radius: f32,
}

/// A larger, partially transparent star registered outside the rotating group.
#[derive(Clone, Debug, PartialEq)]
pub struct BrightStar {
    pub position: Vec3,
    pub color: Hsl,
    pub radius: f32,
    pub opacity: f32,
}

/// Sample `count` regular stars inside a sphere of `radius`.
pub fn generate_stars<R: Rng + ?Sized>(
    rng: &mut R,
    count: u32,
    radius: f32,
    star_size: f32,
) -> Vec<StaticStar> {
    (0..count)
        .map(|_| {
            let position = sample_in_sphere(rng, radius);
            let color = Hsl::random_in(rng, STAR_HUE, STAR_SATURATION, STAR_LIGHTNESS);
            StaticStar {
                position,
                color,
                radius: star_size,
            }
        })
        .collect()
}

/// Sample the bright-star subset described by `config`.
pub fn generate_bright_stars<R: Rng + ?Sized>(
    rng: &mut R,
    config: &StarFieldConfig,
) -> Vec<BrightStar> {
    (0..config.bright_count)
        .map(|_| {
            let position = sample_in_sphere(rng, config.radius);
            let hue = lerp(&STAR_HUE, rng.random());
            BrightStar {
                position,
                color: Hsl::new(hue, config.bright_saturation, config.bright_lightness),
                radius: config.bright_size,
                opacity: config.bright_opacity,
            }
        })
        .collect()
}

/// The registered star field.
pub struct StarField {
    stars: Vec<StaticStar>,
    bright_stars: Vec<BrightStar>,
    group: ObjectHandle,
    cloud: Option<ObjectHandle>,
    bright_handles: Vec<ObjectHandle>,
    rotation: f32,
    rotation_speed: f32,
}

impl StarField {
    /// Generate the stars and register them with the scene.
    pub fn new<R: Rng + ?Sized>(
        config: &StarFieldConfig,
        rng: &mut R,
        scene: &mut dyn SceneHost,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let stars = generate_stars(rng, config.count, config.radius, config.star_size);
        let bright_stars = generate_bright_stars(rng, config);

        let group = scene.create_group();
        let cloud = if stars.is_empty() {
            None
        } else {
            let vertices: Vec<PointVertex> = stars
                .iter()
                .map(|s| PointVertex {
                    position: s.position.to_array(),
                    color: s.color.to_rgb(),
                })
                .collect();
            let cloud = scene.create_point_cloud(&PointCloudDesc {
                vertices: &vertices,
                point_size: config.star_size,
                texture: None,
                blending: Blending::Normal,
                opacity: 1.0,
                depth_write: true,
            });
            scene.add_object(cloud, Some(group));
            Some(cloud)
        };

        // Bright stars sit on the scene root and do not follow the group rotation.
        let bright_handles = bright_stars
            .iter()
            .map(|b| {
                let handle = scene.create_sphere(&SphereDesc {
                    center: b.position,
                    radius: b.radius,
                    color: b.color.to_rgb(),
                    opacity: b.opacity,
                });
                scene.add_object(handle, None);
                handle
            })
            .collect();

        scene.add_object(group, None);

        log::info!(
            "Star field: {} stars, {} bright stars within radius {}",
            stars.len(),
            bright_stars.len(),
            config.radius
        );

        Ok(Self {
            stars,
            bright_stars,
            group,
            cloud,
            bright_handles,
            rotation: 0.0,
            rotation_speed: config.rotation_speed,
        })
    }

    pub fn stars(&self) -> &[StaticStar] {
        &self.stars
    }

    pub fn bright_stars(&self) -> &[BrightStar] {
        &self.bright_stars
    }

    /// Current Y rotation of the star group, wrapped to `[0, 2π)`.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Handle of the rotating group node.
    pub fn group(&self) -> ObjectHandle {
        self.group
    }

    /// Remove and release every object this field registered.
    pub fn teardown(self, scene: &mut dyn SceneHost) {
        if let Some(cloud) = self.cloud {
            scene.remove_object(cloud);
            scene.release(cloud);
        }
        for handle in self.bright_handles {
            scene.remove_object(handle);
            scene.release(handle);
        }
        scene.remove_object(self.group);
        scene.release(self.group);
    }
}

impl Animate for StarField {
    fn animate(&mut self, scene: &mut dyn SceneHost) {
        self.rotation = advance_rotation(self.rotation, self.rotation_speed);
        scene.set_rotation_y(self.group, self.rotation);
    }
}
