//! Platform directory resolution.
//!
//! Config and log locations follow OS conventions (XDG on Linux, Known
//! Folders on Windows, Library on macOS).

use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur during platform operations.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// OS-specific directories for the viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// JSON log files written by debug builds.
    pub log_dir: PathBuf,
}

pub const APP_NAME: &str = "nightsky";

impl PlatformDirs {
    /// Resolve platform-specific directories without creating them on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoConfigDir`] if the OS does not expose a
    /// configuration directory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        let app_dir = config_base.join(APP_NAME);
        Ok(Self {
            config_dir: app_dir.clone(),
            log_dir: app_dir.join("logs"),
        })
    }

    /// Use `config_dir` as given, with logs beneath it.
    ///
    /// Backs the `--config` override and keeps tests off real OS directories.
    pub fn resolve_with_root(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            log_dir: config_dir.join("logs"),
        }
    }

    /// Create all directories on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Io`] if any directory cannot be created.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root_layout() {
        let root = Path::new("some").join("dir");
        let dirs = PlatformDirs::resolve_with_root(&root);
        assert_eq!(dirs.config_dir, root);
        assert_eq!(dirs.log_dir, root.join("logs"));
    }

    #[test]
    fn test_resolve_ends_in_app_name() {
        // Containers without a home directory have no config dir.
        if let Ok(dirs) = PlatformDirs::resolve() {
            assert!(dirs.config_dir.is_absolute());
            assert!(dirs.config_dir.ends_with(APP_NAME));
            assert!(dirs.log_dir.starts_with(&dirs.config_dir));
        }
    }

    #[test]
    fn test_directory_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(&tmp.path().join("nightsky"));
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir(), "config_dir was not created");
        assert!(dirs.log_dir.is_dir(), "log_dir was not created");
    }

    #[test]
    fn test_create_dirs_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        dirs.create_dirs().unwrap();
        assert!(dirs.log_dir.is_dir());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            PlatformError::NoConfigDir.to_string(),
            "could not determine OS configuration directory"
        );
        let io = PlatformError::from(io::Error::other("disk full"));
        assert!(io.to_string().contains("disk full"));
    }
}
