//! The complete night sky: builds every field from one [`Config`] and steps
//! them once per frame.

use nightsky_config::{Config, ConfigError};
use nightsky_render::{SceneHost, SpriteTexture};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::nebula::NebulaField;
use crate::shooting_star::ShootingStarManager;
use crate::starfield::StarField;

/// A scene element that advances by one fixed step per frame.
///
/// Steps are not scaled by elapsed time: visual speed follows the rate at
/// which the host calls `animate`.
pub trait Animate {
    fn animate(&mut self, scene: &mut dyn SceneHost);
}

/// Add `step` to a rotation angle, wrapping into `[0, 2π)`.
pub fn advance_rotation(angle: f32, step: f32) -> f32 {
    (angle + step).rem_euclid(std::f32::consts::TAU)
}

// Independent ChaCha streams so each field's draws do not shift the others.
const STAR_STREAM: u64 = 1;
const NEBULA_STREAM: u64 = 2;
const SHOOTING_STAR_STREAM: u64 = 3;

fn field_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// Snapshot of scene population, for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkyStats {
    pub frame: u64,
    pub stars: usize,
    pub bright_stars: usize,
    pub nebula_particles: usize,
    pub live_shooting_stars: usize,
    pub shooting_stars_spawned: u64,
    pub shooting_stars_expired: u64,
}

/// Stars, nebula and shooting stars registered with one scene.
pub struct NightSky {
    seed: u64,
    frame: u64,
    stars: StarField,
    nebula: NebulaField,
    shooting_stars: ShootingStarManager,
}

impl NightSky {
    /// Validate `config`, generate every field and register it with `scene`.
    ///
    /// Without a configured seed a fresh one is drawn and logged, so a sky
    /// worth keeping can be reproduced with `--seed`.
    pub fn new(config: &Config, scene: &mut dyn SceneHost) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = match config.simulation.seed {
            Some(seed) => seed,
            None => rand::rng().random(),
        };
        log::info!("Building night sky with seed {seed}");

        let stars = StarField::new(&config.stars, &mut field_rng(seed, STAR_STREAM), scene)?;
        let nebula = NebulaField::new(&config.nebula, &mut field_rng(seed, NEBULA_STREAM), scene)?;
        let shooting_stars = ShootingStarManager::new(
            &config.shooting_stars,
            field_rng(seed, SHOOTING_STAR_STREAM),
        )?;

        Ok(Self {
            seed,
            frame: 0,
            stars,
            nebula,
            shooting_stars,
        })
    }

    /// Seed every field was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Frames animated so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn nebula(&self) -> &NebulaField {
        &self.nebula
    }

    pub fn shooting_stars(&self) -> &ShootingStarManager {
        &self.shooting_stars
    }

    /// Sprite shared by the nebula particles.
    pub fn sprite(&self) -> &SpriteTexture {
        self.nebula.sprite()
    }

    pub fn stats(&self) -> SkyStats {
        SkyStats {
            frame: self.frame,
            stars: self.stars.stars().len(),
            bright_stars: self.stars.bright_stars().len(),
            nebula_particles: self.nebula.particle_count(),
            live_shooting_stars: self.shooting_stars.live().len(),
            shooting_stars_spawned: self.shooting_stars.spawned_total(),
            shooting_stars_expired: self.shooting_stars.expired_total(),
        }
    }

    /// Remove and release everything the sky registered.
    pub fn teardown(mut self, scene: &mut dyn SceneHost) {
        self.shooting_stars.clear(scene);
        self.nebula.teardown(scene);
        self.stars.teardown(scene);
        log::info!("Night sky torn down after {} frames", self.frame);
    }
}

impl Animate for NightSky {
    /// Stars, then nebula, then shooting stars.
    fn animate(&mut self, scene: &mut dyn SceneHost) {
        self.stars.animate(scene);
        self.nebula.animate(scene);
        self.shooting_stars.animate(scene);
        self.frame += 1;
    }
}
