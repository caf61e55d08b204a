//! Platform directory resolution.
//!
//! Config and log locations follow OS conventions (XDG on Linux, Known Folders
//! on Windows, Library on macOS).

use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur during platform operations.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    /// Directory creation failed.
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

const APP_NAME: &str = "orrery";

/// OS-specific directories for the orrery.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// JSON log files in debug builds.
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve platform-specific directories without creating them on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoConfigDir`] if the OS does not expose a
    /// configuration directory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        Ok(Self::resolve_with_root(&base))
    }

    /// Resolve directories rooted under a custom base path. `--config` and
    /// tests use this.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Uses `config_dir` as given, with logs next to it.
    pub fn from_config_dir(config_dir: PathBuf) -> Self {
        let log_dir = config_dir.join("logs");
        Self {
            config_dir,
            log_dir,
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
        let root = Path::new("base");
        let dirs = PlatformDirs::resolve_with_root(root);
        assert_eq!(dirs.config_dir, root.join("orrery").join("config"));
        assert_eq!(dirs.log_dir, root.join("orrery").join("logs"));
    }

    #[test]
    fn test_from_config_dir() {
        let dirs = PlatformDirs::from_config_dir(PathBuf::from("custom"));
        assert_eq!(dirs.config_dir, PathBuf::from("custom"));
        assert_eq!(dirs.log_dir, Path::new("custom").join("logs"));
    }

    #[test]
    fn test_directory_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.exists(), "config_dir was not created");
        assert!(dirs.log_dir.exists(), "log_dir was not created");
    }
}
