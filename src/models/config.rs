use palette_pack::{BracketStyle, ColorDepth};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";

/// Application configuration loaded from a YAML file.
///
/// Every field is optional in the file; missing ones take the defaults
/// below. Per-invocation flags and query parameters override the reform
/// defaults.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Output bit depth (1, 4 or 8)
    #[serde(default = "default_depth")]
    pub depth: ColorDepth,

    /// Dither kernel name, or "none"
    #[serde(default = "default_dither")]
    pub dither: String,

    /// Target width; the source width when unset
    #[serde(default)]
    pub width: Option<usize>,

    /// Target height; the source height when unset
    #[serde(default)]
    pub height: Option<usize>,

    /// Prefix of the generated C identifiers
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Brace placement in the generated source
    #[serde(default)]
    pub bracket_style: BracketStyle,

    /// Listen address for `serve`
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_depth() -> ColorDepth {
    ColorDepth::Eight
}

fn default_dither() -> String {
    "none".to_string()
}

fn default_prefix() -> String {
    "image".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

impl AppConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Path to load: the explicit one, else `$CONFIG_FILE`.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from))
    }

    /// Load configuration from the explicit path or `$CONFIG_FILE`.
    ///
    /// Defaults are used only when no path is configured. A configured file
    /// that cannot be read or parsed is an error, never replaced by defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, PipelineError> {
        let Some(path) = Self::resolve_path(explicit) else {
            tracing::debug!("No config file configured, using defaults");
            return Ok(Self::default());
        };

        let invalid = |message: String| PipelineError::Config {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(&path).map_err(|e| invalid(e.to_string()))?;
        let config = Self::from_yaml_str(&content).map_err(|e| invalid(e.to_string()))?;

        tracing::info!(
            path = %path.display(),
            depth = %config.depth,
            dither = %config.dither,
            "Loaded configuration"
        );
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            dither: default_dither(),
            width: None,
            height: None,
            prefix: default_prefix(),
            bracket_style: BracketStyle::default(),
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.depth, ColorDepth::Eight);
        assert_eq!(config.dither, "none");
        assert_eq!(config.width, None);
        assert_eq!(config.height, None);
        assert_eq!(config.prefix, "image");
        assert_eq!(config.bracket_style, BracketStyle::SameLine);
        assert_eq!(config.bind, "0.0.0.0:3000");
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
depth: 4
dither: FloydSteinberg
width: 128
height: 64
prefix: logo
bracket_style: allman
bind: 127.0.0.1:8080
max_upload_bytes: 1024
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.depth, ColorDepth::Four);
        assert_eq!(config.dither, "FloydSteinberg");
        assert_eq!(config.width, Some(128));
        assert_eq!(config.height, Some(64));
        assert_eq!(config.prefix, "logo");
        assert_eq!(config.bracket_style, BracketStyle::NextLine);
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = AppConfig::from_yaml_str("depth: 1\n").unwrap();
        assert_eq!(config.depth, ColorDepth::One);
        assert_eq!(config.prefix, "image");
        assert_eq!(config.bracket_style, BracketStyle::SameLine);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(AppConfig::from_yaml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_depth_rejected() {
        assert!(AppConfig::from_yaml_str("depth: 2\n").is_err());
    }

    #[test]
    fn test_invalid_bracket_style_rejected() {
        assert!(AppConfig::from_yaml_str("bracket_style: gnu\n").is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(AppConfig::from_yaml_str("colour_depth: 4\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prefix: splash\ndepth: 4").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.prefix, "splash");
        assert_eq!(config.depth, ColorDepth::Four);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("missing.yaml"))).unwrap_err();
        assert!(matches!(err, PipelineError::Config { .. }), "{err:?}");
    }

    #[test]
    fn test_load_invalid_depth_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "depth: 2\nprefix: splash\nwidth: 16").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        let PipelineError::Config { path, .. } = &err else {
            panic!("expected a config error, got {err:?}");
        };
        assert_eq!(path, &file.path().display().to_string());
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "depth: [not, a, number]").unwrap();

        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(PipelineError::Config { .. })
        ));
    }
}
