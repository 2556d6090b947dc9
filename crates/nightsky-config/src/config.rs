//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest accepted sprite texture edge, in pixels.
pub const MAX_TEXTURE_SIZE: u32 = 4096;

/// Top-level night sky configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Camera framing and clear color.
    pub camera: CameraConfig,
    /// Static star field.
    pub stars: StarFieldConfig,
    /// Nebula blobs.
    pub nebula: NebulaConfig,
    /// Shooting star spawning and motion.
    pub shooting_stars: ShootingStarConfig,
    /// Seeding and frame pacing.
    pub simulation: SimulationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Camera position on the Z axis, looking toward the origin.
    pub initial_z: f32,
    /// Scene background color as `0xRRGGBB`.
    pub background_color: u32,
}

/// Static star field configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarFieldConfig {
    /// Number of small grouped stars.
    pub count: u32,
    /// Radius of the sphere the stars are sampled in.
    pub radius: f32,
    /// Rendered size of a regular star.
    pub star_size: f32,
    /// Y-axis rotation added to the star group per frame, in radians.
    pub rotation_speed: f32,
    /// Number of individually registered bright stars.
    pub bright_count: u32,
    /// Rendered size of a bright star.
    pub bright_size: f32,
    /// Saturation shared by all bright stars.
    pub bright_saturation: f32,
    /// Lightness shared by all bright stars.
    pub bright_lightness: f32,
    /// Opacity of a bright star.
    pub bright_opacity: f32,
}

/// Nebula configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NebulaConfig {
    /// Number of nebula blobs.
    pub count: u32,
    /// Particles per blob.
    pub particles_per_blob: u32,
    /// Blob centers are sampled in a cube of this half-width.
    pub center_extent: f32,
    /// Minimum blob size.
    pub base_size: f32,
    /// Random extra size added on top of `base_size`.
    pub size_variation: f32,
    /// Lower bound of the per-blob hue.
    pub hue_min: f32,
    /// Upper bound of the per-blob hue.
    pub hue_max: f32,
    /// Particle opacity. Kept low so overlapping particles accumulate.
    pub opacity: f32,
    /// Rendered particle size.
    pub point_size: f32,
    /// Y-axis rotation added to the nebula group per frame, in radians.
    pub rotation_speed: f32,
    /// Width and height of the particle sprite texture in pixels.
    pub texture_size: u32,
}

/// Shooting star configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShootingStarConfig {
    /// Probability of spawning a shooting star on a given frame.
    pub spawn_probability: f32,
    /// Radius of the sphere spawn points are sampled in.
    pub spawn_radius: f32,
    /// Distance travelled per frame before jitter.
    pub base_speed: f32,
    /// Lifespan in frames before jitter.
    pub base_lifespan: u32,
    /// Relative jitter applied to speed: factor in `[1 - j, 1 + j)`.
    pub speed_jitter: f32,
    /// Relative jitter applied to lifespan: factor in `[1 - j, 1 + j)`.
    pub lifespan_jitter: f32,
    /// Per-axis perturbation of the inward direction, in `[-j, j)`.
    pub direction_jitter: f32,
    /// Shortest trail length.
    pub min_length: f32,
    /// Longest trail length.
    pub max_length: f32,
    /// Trail opacity.
    pub opacity: f32,
}

/// Seeding and frame pacing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed seed for reproducible skies. `None` draws a fresh seed each run.
    pub seed: Option<u64>,
    /// Target frame rate (0 = unpaced).
    pub target_fps: u32,
    /// Stop after this many frames. `None` runs until interrupted.
    pub frame_limit: Option<u64>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log statistics every this many frames (0 = never).
    pub stats_interval: u64,
    /// Check `config.ron` for changes every this many frames (0 = never).
    pub reload_interval: u64,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Night Sky".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            initial_z: 55.0,
            background_color: 0x000011,
        }
    }
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        Self {
            count: 15_000,
            radius: 200.0,
            star_size: 0.1,
            rotation_speed: 0.0005,
            bright_count: 20,
            bright_size: 0.2,
            bright_saturation: 0.9,
            bright_lightness: 0.9,
            bright_opacity: 0.9,
        }
    }
}

impl Default for NebulaConfig {
    fn default() -> Self {
        Self {
            count: 5,
            particles_per_blob: 1000,
            center_extent: 50.0,
            base_size: 10.0,
            size_variation: 20.0,
            hue_min: 0.6,
            hue_max: 0.9,
            opacity: 0.1,
            point_size: 2.0,
            rotation_speed: 0.002,
            texture_size: 128,
        }
    }
}

impl Default for ShootingStarConfig {
    fn default() -> Self {
        Self {
            spawn_probability: 0.05,
            spawn_radius: 300.0,
            base_speed: 5.0,
            base_lifespan: 100,
            speed_jitter: 0.2,
            lifespan_jitter: 0.2,
            direction_jitter: 0.25,
            min_length: 10.0,
            max_length: 20.0,
            opacity: 0.8,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            target_fps: 60,
            frame_limit: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            stats_interval: 600,
            reload_interval: 120,
            log_level: "info".to_string(),
        }
    }
}

// --- Validation ---

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn require_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be in [0, 1], got {value}")))
    }
}

fn require_jitter(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be in [0, 1), got {value}")))
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must not be negative, got {value}")))
    }
}

impl CameraConfig {
    /// Check clip planes and field of view.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::invalid(
                "camera.fov_degrees",
                format!("must be in (0, 180), got {}", self.fov_degrees),
            ));
        }
        require_positive("camera.near", self.near)?;
        if !(self.far > self.near) {
            return Err(ConfigError::invalid(
                "camera.far",
                format!("must exceed near ({}), got {}", self.near, self.far),
            ));
        }
        if self.background_color > 0xFF_FFFF {
            return Err(ConfigError::invalid(
                "camera.background_color",
                format!("must fit in 0xRRGGBB, got {:#x}", self.background_color),
            ));
        }
        Ok(())
    }
}

impl StarFieldConfig {
    /// Check radius, sizes and bright-star color channels.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("stars.radius", self.radius)?;
        require_positive("stars.star_size", self.star_size)?;
        require_non_negative("stars.rotation_speed", self.rotation_speed)?;
        require_positive("stars.bright_size", self.bright_size)?;
        require_unit("stars.bright_saturation", self.bright_saturation)?;
        require_unit("stars.bright_lightness", self.bright_lightness)?;
        require_unit("stars.bright_opacity", self.bright_opacity)?;
        Ok(())
    }
}

impl NebulaConfig {
    /// Check sizes, the hue range, opacity and texture size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("nebula.center_extent", self.center_extent)?;
        require_positive("nebula.base_size", self.base_size)?;
        require_non_negative("nebula.size_variation", self.size_variation)?;
        require_unit("nebula.hue_min", self.hue_min)?;
        require_unit("nebula.hue_max", self.hue_max)?;
        if self.hue_min > self.hue_max {
            return Err(ConfigError::invalid(
                "nebula.hue_max",
                format!("must not be below hue_min ({}), got {}", self.hue_min, self.hue_max),
            ));
        }
        require_unit("nebula.opacity", self.opacity)?;
        require_positive("nebula.point_size", self.point_size)?;
        require_non_negative("nebula.rotation_speed", self.rotation_speed)?;
        if self.texture_size == 0 || self.texture_size > MAX_TEXTURE_SIZE {
            return Err(ConfigError::invalid(
                "nebula.texture_size",
                format!("must be in 1..={MAX_TEXTURE_SIZE}, got {}", self.texture_size),
            ));
        }
        Ok(())
    }
}

impl ShootingStarConfig {
    /// Check probability, jitters and the trail length range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_unit("shooting_stars.spawn_probability", self.spawn_probability)?;
        require_positive("shooting_stars.spawn_radius", self.spawn_radius)?;
        require_non_negative("shooting_stars.base_speed", self.base_speed)?;
        require_jitter("shooting_stars.speed_jitter", self.speed_jitter)?;
        require_jitter("shooting_stars.lifespan_jitter", self.lifespan_jitter)?;
        require_jitter("shooting_stars.direction_jitter", self.direction_jitter)?;
        require_positive("shooting_stars.min_length", self.min_length)?;
        require_positive("shooting_stars.max_length", self.max_length)?;
        if self.max_length < self.min_length {
            return Err(ConfigError::invalid(
                "shooting_stars.max_length",
                format!(
                    "must not be below min_length ({}), got {}",
                    self.min_length, self.max_length
                ),
            ));
        }
        require_unit("shooting_stars.opacity", self.opacity)?;
        Ok(())
    }
}

impl Config {
    /// Validate every section. Called on load and before building a scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::invalid(
                "window",
                format!("size must be non-zero, got {}x{}", self.window.width, self.window.height),
            ));
        }
        self.camera.validate()?;
        self.stars.validate()?;
        self.nebula.validate()?;
        self.shooting_stars.validate()?;
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
