//! Shooting stars: short white streaks that spawn just outside the star shell,
//! fly roughly toward the center, and disappear after a jittered lifespan.
//!
//! Each streak moves through three phases:
//!
//! ```text
//! Spawned --animate--> Aging --age > lifespan--> Expired (removed, released)
//! ```
//!
//! Kinematics live in [`ShootingStar`], owned by the manager and keyed by a
//! stable [`ShootingStarId`]. The scene only ever sees a line segment handle.

use glam::Vec3;
use nightsky_config::{ConfigError, ShootingStarConfig};
use nightsky_render::{Blending, LineSegmentDesc, ObjectHandle, SceneHost};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::sampling::sample_in_sphere;
use crate::sky::Animate;

const TRAIL_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Stable identifier of a shooting star, unique for the manager's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShootingStarId(pub u64);

/// Lifecycle phase of a shooting star.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Created this frame, not yet advanced.
    Spawned,
    /// Moving; `age <= lifespan`.
    Aging,
    /// `age > lifespan`. Terminal; the manager drops the star in the same step.
    Expired,
}

/// Kinematic state of one shooting star.
#[derive(Clone, Debug, PartialEq)]
pub struct ShootingStar {
    pub id: ShootingStarId,
    /// Trail tail at spawn time.
    pub start: Vec3,
    /// Trail head at spawn time: `start + direction * length`.
    pub end: Vec3,
    /// Unit travel direction.
    pub direction: Vec3,
    /// Distance travelled per frame.
    pub speed: f32,
    pub lifespan_frames: u32,
    pub age_frames: u32,
    /// Distance travelled so far, applied as the trail's translation.
    pub offset: Vec3,
    /// Manager frame on which the star was created.
    pub spawn_frame: u64,
    handle: ObjectHandle,
}

impl ShootingStar {
    pub fn phase(&self) -> Phase {
        if self.age_frames == 0 {
            Phase::Spawned
        } else if self.age_frames <= self.lifespan_frames {
            Phase::Aging
        } else {
            Phase::Expired
        }
    }

    /// Render handle of the trail.
    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// Advance one frame. Returns the phase after the step.
    fn step(&mut self) -> Phase {
        self.offset += self.direction * self.speed;
        self.age_frames = self.age_frames.saturating_add(1);
        self.phase()
    }
}

/// Spawns, moves and retires shooting stars.
pub struct ShootingStarManager {
    config: ShootingStarConfig,
    rng: ChaCha8Rng,
    live: Vec<ShootingStar>,
    next_id: u64,
    frame: u64,
    spawned_total: u64,
    expired_total: u64,
}

impl ShootingStarManager {
    pub fn new(config: &ShootingStarConfig, rng: ChaCha8Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            rng,
            live: Vec::new(),
            next_id: 0,
            frame: 0,
            spawned_total: 0,
            expired_total: 0,
        })
    }

    /// Live shooting stars, in spawn order.
    pub fn live(&self) -> &[ShootingStar] {
        &self.live
    }

    pub fn get(&self, id: ShootingStarId) -> Option<&ShootingStar> {
        self.live.iter().find(|s| s.id == id)
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    pub fn expired_total(&self) -> u64 {
        self.expired_total
    }

    /// Expected number of simultaneously live stars: `p * lifespan`.
    pub fn expected_live(&self) -> f32 {
        self.config.spawn_probability * self.config.base_lifespan as f32
    }

    /// `base * factor` with the factor uniform in `[1 - jitter, 1 + jitter)`.
    fn jittered(&mut self, base: f32, jitter: f32) -> f32 {
        base * (1.0 - jitter + 2.0 * jitter * self.rng.random::<f32>())
    }

    /// Create a shooting star now, regardless of the spawn probability.
    pub fn spawn(&mut self, scene: &mut dyn SceneHost) -> ShootingStarId {
        let start = sample_in_sphere(&mut self.rng, self.config.spawn_radius);

        let inward = (-start).try_normalize().unwrap_or(Vec3::NEG_Z);
        let j = self.config.direction_jitter;
        let perturbed = inward
            + Vec3::new(
                (self.rng.random::<f32>() - 0.5) * 2.0 * j,
                (self.rng.random::<f32>() - 0.5) * 2.0 * j,
                (self.rng.random::<f32>() - 0.5) * 2.0 * j,
            );
        let direction = perturbed.try_normalize().unwrap_or(inward);

        let length = self.config.min_length
            + self.rng.random::<f32>() * (self.config.max_length - self.config.min_length);
        let end = start + direction * length;

        let speed = self.jittered(self.config.base_speed, self.config.speed_jitter);
        // Integer age exceeds a fractional lifespan exactly when it exceeds its floor.
        let lifespan_frames = self
            .jittered(self.config.base_lifespan as f32, self.config.lifespan_jitter)
            .floor() as u32;

        let handle = scene.create_line_segment(&LineSegmentDesc {
            start,
            end,
            color: TRAIL_COLOR,
            opacity: self.config.opacity,
            blending: Blending::Additive,
        });
        scene.add_object(handle, None);

        let id = ShootingStarId(self.next_id);
        self.next_id += 1;
        self.spawned_total += 1;
        log::trace!("Shooting star {id:?} spawned at {start}, lifespan {lifespan_frames}");

        self.live.push(ShootingStar {
            id,
            start,
            end,
            direction,
            speed,
            lifespan_frames,
            age_frames: 0,
            offset: Vec3::ZERO,
            spawn_frame: self.frame,
            handle,
        });
        id
    }

    /// Move every live star one step and retire the expired ones.
    fn advance(&mut self, scene: &mut dyn SceneHost) {
        let mut expired = 0;
        self.live.retain_mut(|star| {
            if star.step() == Phase::Expired {
                scene.remove_object(star.handle);
                scene.release(star.handle);
                log::trace!("Shooting star {:?} expired at age {}", star.id, star.age_frames);
                expired += 1;
                false
            } else {
                scene.set_translation(star.handle, star.offset);
                true
            }
        });
        self.expired_total += expired;
    }

    /// Remove and release every live star.
    pub fn clear(&mut self, scene: &mut dyn SceneHost) {
        for star in self.live.drain(..) {
            scene.remove_object(star.handle);
            scene.release(star.handle);
        }
    }
}

impl Animate for ShootingStarManager {
    fn animate(&mut self, scene: &mut dyn SceneHost) {
        if self.rng.random::<f32>() < self.config.spawn_probability {
            self.spawn(scene);
        }
        self.advance(scene);
        self.frame += 1;
    }
}
