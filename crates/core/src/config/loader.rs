//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed and validated settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist; otherwise the standard locations are
    /// searched and defaults are used when none is present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };
        schema.validate()?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load with defaults only (no file)
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let candidates = [".routeplay.toml", "routeplay.toml", ".config/routeplay.toml"];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(PathBuf::from(candidate));
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("routeplay").join("config.toml"))
        .filter(|p| p.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::from(e).with_context(format!("While parsing {}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert!(config.path.is_none());
        assert_eq!(config.schema.parser.coordinate_precision, 8);
        assert_eq!(config.schema.playback.animation_speed, 3.0);
        assert_eq!(config.schema.playback.warmup_frames, 3);
        assert_eq!(config.schema.playback.dwell().as_secs(), 3);
        assert_eq!(config.schema.reveal.interval().as_millis(), 100);
        assert!(!config.schema.telemetry.json);
    }

    #[test]
    fn test_telemetry_section() {
        let file = write_config("[telemetry]\nlog_level = \"debug\"\njson = true\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.schema.telemetry.log_level, "debug");
        assert!(config.schema.telemetry.json);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let file = write_config("[playback]\ndwell_secs = 1.5\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.schema.playback.dwell_secs, 1.5);
        assert_eq!(config.schema.playback.frame_interval_ms, 16);
        assert_eq!(config.schema.parser.coordinate_precision, 8);
        assert!(config.path.is_some());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_malformed_toml() {
        let file = write_config("[playback\ndwell_secs = ");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_validation_rejects_bad_precision() {
        let file = write_config("[parser]\ncoordinate_precision = 0\n");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
    }

    #[test]
    fn test_validation_rejects_negative_dwell() {
        let file = write_config("[playback]\ndwell_secs = -2.0\n");
        assert!(Config::load(Some(file.path())).is_err());
    }
}
