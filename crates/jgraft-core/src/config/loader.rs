//! Configuration file discovery and loading

use super::JGraftConfiguration;
use crate::error::JGraftError;
use crate::Result;
use std::path::{Path, PathBuf};

/// File names searched in each directory, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &["jgraft.toml", ".jgraft.toml"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by walking upward from `start_path`
    ///
    /// Each directory is checked for `jgraft.toml`, then `.jgraft.toml`,
    /// until one is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| JGraftError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<JGraftConfiguration> {
        let content =
            std::fs::read_to_string(path).map_err(|e| JGraftError::io_error(path, e))?;
        toml::from_str(&content).map_err(|e| {
            JGraftError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load config from `custom_path`, or discover one from `start_dir`
    ///
    /// Without a custom path and without a discovered file the defaults are
    /// used.
    pub fn load(
        custom_path: Option<&Path>,
        start_dir: Option<&Path>,
    ) -> Result<JGraftConfiguration> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(JGraftError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(JGraftConfiguration::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::CaptureStrategy;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "jgraft.toml",
            "[comments]\nstrategy = \"lexicalScan\"\n",
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.capture_strategy(), CaptureStrategy::LexicalScan);
    }

    #[test]
    fn test_auto_discover_walks_upward() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/main/java");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), ".jgraft.toml", "");

        let found = ConfigLoader::auto_discover(&nested).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), ".jgraft.toml");
    }

    #[test]
    fn test_plain_name_wins_over_dotfile() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), ".jgraft.toml", "");
        create_temp_config(temp_dir.path(), "jgraft.toml", "");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), "jgraft.toml");
    }

    #[test]
    fn test_load_custom_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "custom.toml",
            "[transform]\ndeleteAnnotations = false\n",
        );

        let config = ConfigLoader::load(Some(&config_path), None).unwrap();
        assert!(!config.delete_annotations());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let err = ConfigLoader::load(Some(Path::new("nonexistent.toml")), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = ConfigLoader::load_from_file(Path::new("nonexistent.toml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "jgraft.toml", "[printer\n");
        let err = ConfigLoader::load_from_file(&config_path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
