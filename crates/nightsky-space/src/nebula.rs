//! Nebula blobs: clusters of soft additive particles around random centers,
//! denser toward the core and desaturating toward the rim.

use glam::Vec3;
use nightsky_config::{ConfigError, NebulaConfig};
use nightsky_render::{
    Blending, ObjectHandle, PointCloudDesc, PointVertex, SceneHost, SpriteTexture, TextureHandle,
};
use rand::Rng;

use crate::color::{Hsl, lerp};
use crate::sampling::unit_direction;
use crate::sky::{Animate, advance_rotation};

const PARTICLE_LIGHTNESS: std::ops::Range<f32> = 0.4..0.6;

/// One particle of a blob, in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct NebulaParticle {
    pub position: Vec3,
    pub color: Hsl,
}

/// A single nebula cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct NebulaBlob {
    pub center: Vec3,
    pub size: f32,
    pub hue: f32,
    pub particles: Vec<NebulaParticle>,
}

/// Saturation of a particle `distance` away from the center of a blob of `size`.
///
/// Fully saturated at the center, grey from half the nominal size outward.
pub fn particle_saturation(distance: f32, size: f32) -> f32 {
    (1.0 - distance / (size * 0.5)).max(0.0)
}

/// Generate one blob. Center, size and hue are drawn even when the blob has
/// no particles.
pub fn generate_blob<R: Rng + ?Sized>(rng: &mut R, config: &NebulaConfig) -> NebulaBlob {
    let extent = config.center_extent;
    let center = Vec3::new(
        (rng.random::<f32>() - 0.5) * 2.0 * extent,
        (rng.random::<f32>() - 0.5) * 2.0 * extent,
        (rng.random::<f32>() - 0.5) * 2.0 * extent,
    );
    let size = rng.random::<f32>() * config.size_variation + config.base_size;
    let hue = lerp(&(config.hue_min..config.hue_max), rng.random());

    let particles = (0..config.particles_per_blob)
        .map(|_| {
            // sqrt instead of cbrt: denser toward the core than volume-uniform.
            let radius = size * rng.random::<f32>().sqrt();
            let offset = unit_direction(rng) * radius;
            let saturation = particle_saturation(offset.length(), size);
            let lightness = lerp(&PARTICLE_LIGHTNESS, rng.random());
            NebulaParticle {
                position: center + offset,
                color: Hsl::new(hue, saturation, lightness),
            }
        })
        .collect();

    NebulaBlob {
        center,
        size,
        hue,
        particles,
    }
}

/// All nebula blobs, rotating together as one group.
pub struct NebulaField {
    blobs: Vec<NebulaBlob>,
    sprite: SpriteTexture,
    texture: TextureHandle,
    group: ObjectHandle,
    clouds: Vec<ObjectHandle>,
    rotation: f32,
    rotation_speed: f32,
}

impl NebulaField {
    /// Generate the blobs and register them with the scene.
    pub fn new<R: Rng + ?Sized>(
        config: &NebulaConfig,
        rng: &mut R,
        scene: &mut dyn SceneHost,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let blobs: Vec<NebulaBlob> = (0..config.count)
            .map(|_| generate_blob(rng, config))
            .collect();

        let sprite = SpriteTexture::radial_glow(config.texture_size);
        let texture = scene.create_texture(&sprite);
        let group = scene.create_group();

        let mut clouds = Vec::with_capacity(blobs.len());
        for blob in blobs.iter().filter(|b| !b.particles.is_empty()) {
            let vertices: Vec<PointVertex> = blob
                .particles
                .iter()
                .map(|p| PointVertex {
                    position: p.position.to_array(),
                    color: p.color.to_rgb(),
                })
                .collect();
            let cloud = scene.create_point_cloud(&PointCloudDesc {
                vertices: &vertices,
                point_size: config.point_size,
                texture: Some(texture),
                blending: Blending::Additive,
                opacity: config.opacity,
                depth_write: false,
            });
            scene.add_object(cloud, Some(group));
            clouds.push(cloud);
        }
        scene.add_object(group, None);

        log::info!(
            "Nebula: {} blobs, {} particles each",
            blobs.len(),
            config.particles_per_blob
        );
        for (i, blob) in blobs.iter().enumerate() {
            log::debug!(
                "Nebula blob {i}: center {}, size {:.1}, hue {:.2}",
                blob.center,
                blob.size,
                blob.hue
            );
        }

        Ok(Self {
            blobs,
            sprite,
            texture,
            group,
            clouds,
            rotation: 0.0,
            rotation_speed: config.rotation_speed,
        })
    }

    pub fn blobs(&self) -> &[NebulaBlob] {
        &self.blobs
    }

    pub fn particle_count(&self) -> usize {
        self.blobs.iter().map(|b| b.particles.len()).sum()
    }

    /// Current Y rotation of the nebula group, wrapped to `[0, 2π)`.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn group(&self) -> ObjectHandle {
        self.group
    }

    /// Sprite shared by every blob.
    pub fn sprite(&self) -> &SpriteTexture {
        &self.sprite
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Remove and release every object this field registered, then the sprite.
    pub fn teardown(self, scene: &mut dyn SceneHost) {
        for cloud in self.clouds {
            scene.remove_object(cloud);
            scene.release(cloud);
        }
        scene.remove_object(self.group);
        scene.release(self.group);
        scene.release_texture(self.texture);
    }
}

impl Animate for NebulaField {
    fn animate(&mut self, scene: &mut dyn SceneHost) {
        self.rotation = advance_rotation(self.rotation, self.rotation_speed);
        scene.set_rotation_y(self.group, self.rotation);
    }
}
