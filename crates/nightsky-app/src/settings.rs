//! Settings in effect for a run: `config.ron` plus CLI overrides, with hot
//! reload of the file while the frame loop runs.

use std::path::Path;

use nightsky_config::{CliArgs, Config, ConfigError};
use nightsky_render::{Camera, Viewport};

/// Loaded configuration.
#[derive(Debug)]
pub struct Settings {
    /// Settings as read from disk, before CLI overrides.
    pub file: Config,
    /// Settings in effect.
    pub config: Config,
    /// Why the file was ignored in favour of defaults, if it was.
    pub fallback: Option<ConfigError>,
}

impl Settings {
    /// Load `config.ron` from `config_dir` (creating it if missing) and apply
    /// CLI overrides.
    ///
    /// An unreadable or unparsable file falls back to defaults. Out-of-range
    /// values are rejected whether they come from the file or the command line.
    pub fn load(config_dir: &Path, args: &CliArgs) -> Result<Self, ConfigError> {
        let (file, fallback) = match Config::load_or_create(config_dir) {
            Ok(file) => (file, None),
            Err(e @ ConfigError::Invalid { .. }) => return Err(e),
            Err(e) => (Config::default(), Some(e)),
        };
        let mut config = file.clone();
        config.apply_cli_overrides(args);
        config.validate()?;
        Ok(Self {
            file,
            config,
            fallback,
        })
    }

    /// Re-read `config.ron`. Returns `true` when the settings in effect changed.
    ///
    /// On error the current settings are kept.
    pub fn reload(&mut self, config_dir: &Path, args: &CliArgs) -> Result<bool, ConfigError> {
        let Some(file) = self.file.reload(config_dir)? else {
            return Ok(false);
        };
        let mut config = file.clone();
        config.apply_cli_overrides(args);
        config.validate()?;

        self.file = file;
        let changed = config != self.config;
        self.config = config;
        Ok(changed)
    }

    /// Resize the viewport to the configured window size.
    pub fn apply_window(&self, viewport: &mut Viewport, camera: &mut Camera) -> bool {
        viewport.resize(self.config.window.width, self.config.window.height, camera)
    }
}
