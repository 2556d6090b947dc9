//! Procedural night sky population: volume-uniform star sampling, nebula
//! particle clusters, and the shooting star lifecycle.

pub mod color;
pub mod nebula;
pub mod sampling;
pub mod shooting_star;
pub mod sky;
pub mod starfield;

pub use color::Hsl;
pub use nebula::{NebulaBlob, NebulaField, NebulaParticle, generate_blob, particle_saturation};
pub use sampling::{sample_in_sphere, unit_direction};
pub use shooting_star::{Phase, ShootingStar, ShootingStarId, ShootingStarManager};
pub use sky::{Animate, NightSky, SkyStats, advance_rotation};
pub use starfield::{BrightStar, StarField, StaticStar, generate_bright_stars, generate_stars};
