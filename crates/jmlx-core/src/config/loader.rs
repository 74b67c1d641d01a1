//! Configuration file discovery and loading

use super::JmlxConfig;
use crate::error::JmlxError;
use crate::result::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// File names searched in each directory, in priority order
const CONFIG_FILE_NAMES: &[&str] = &[".jmlx.toml", ".jmlx.json", "jmlx.toml", "jmlx.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by walking up from `start_path`
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| JmlxError::config_error(format!("Invalid path: {e}")))?;

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

    /// Load configuration from a TOML or JSON file, chosen by extension
    pub fn load_from_file(path: &Path) -> Result<JmlxConfig> {
        let content = fs::read_to_string(path).map_err(|e| JmlxError::io_error(path, e))?;
        let parsed: std::result::Result<JmlxConfig, String> = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            _ => Err("unsupported file extension (expected .toml or .json)".to_string()),
        };
        parsed.map_err(|e| {
            JmlxError::config_error(format!(
                "Failed to load config from '{}': {e}",
                path.display()
            ))
        })
    }

    /// Load from `custom_path`, or auto-discover from `start_dir`
    ///
    /// Unlike an explicit path, a failed discovery is not an error: the
    /// defaults apply.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<JmlxConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(JmlxError::config_error(format!(
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
                Ok(JmlxConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "jmlx.toml",
            r#"
[parser]
jmlKeys = ["ESC", "openjml"]

[printer]
indentSize = 2
printJavadoc = false
"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.parser.jml_keys, vec!["ESC", "openjml"]);
        assert_eq!(config.printer.indent_size, 2);
        assert!(!config.printer.print_javadoc);
        assert!(config.printer.print_comments);
    }

    #[test]
    fn test_load_from_file_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "jmlx.json",
            r#"{ "printer": { "positionInterleaving": false } }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert!(!config.printer.position_interleaving);
    }

    #[test]
    fn test_auto_discover_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/main/java");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), ".jmlx.toml", "");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".jmlx.toml");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "jmlx.json", "{}");
        create_temp_config(temp_dir.path(), ".jmlx.json", "{}");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".jmlx.json");
    }

    #[test]
    fn test_load_errors() {
        assert!(ConfigLoader::load_from_file(Path::new("nonexistent.toml")).is_err());

        let temp_dir = TempDir::new().unwrap();
        let invalid = create_temp_config(temp_dir.path(), "jmlx.json", "{ invalid json }");
        let err = ConfigLoader::load_from_file(&invalid).unwrap_err();
        assert!(matches!(err, JmlxError::ConfigError { .. }));

        let yaml = create_temp_config(temp_dir.path(), "jmlx.yaml", "parser: {}");
        assert!(ConfigLoader::load_from_file(&yaml).is_err());

        let missing = temp_dir.path().join("missing.toml");
        assert!(ConfigLoader::load(Some(&missing), None).is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(temp_dir.path(), "custom.toml", "[printer]\nindentSize = 8\n");
        let config = ConfigLoader::load(Some(&path), None).unwrap();
        assert_eq!(config.printer.indent_size, 8);
    }
}
