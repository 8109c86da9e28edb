//! Per-invocation reform settings.
//!
//! Settings start from [`AppConfig`] and are overridden by CLI flags or HTTP
//! query parameters. Everything is validated here, before any pixel work.

use palette_pack::{BracketStyle, ColorDepth, DitherKernel};
use serde::Deserialize;

use crate::error::PipelineError;
use crate::models::AppConfig;

/// Optional overrides, as they arrive from the CLI or a query string.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SettingsOverrides {
    pub depth: Option<u8>,
    pub dither: Option<String>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub prefix: Option<String>,
    pub style: Option<String>,
}

/// Fully validated settings for one reform run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReformSettings {
    pub depth: ColorDepth,
    pub dither: Option<DitherKernel>,
    /// Target width, `None` keeps the source width
    pub width: Option<usize>,
    /// Target height, `None` keeps the source height
    pub height: Option<usize>,
    pub prefix: String,
    pub bracket_style: BracketStyle,
}

impl ReformSettings {
    /// Merge `overrides` onto `config` and validate the result.
    pub fn resolve(config: &AppConfig, overrides: &SettingsOverrides) -> Result<Self, PipelineError> {
        let depth = match overrides.depth {
            Some(bits) => ColorDepth::from_bits(bits)?,
            None => config.depth,
        };

        let dither_name = overrides.dither.as_deref().unwrap_or(&config.dither);
        let dither = DitherKernel::parse_optional(dither_name)?;

        let bracket_style = match overrides.style.as_deref() {
            Some(style) => style.parse()?,
            None => config.bracket_style,
        };

        let width = overrides.width.or(config.width);
        let height = overrides.height.or(config.height);
        if width == Some(0) {
            return Err(PipelineError::ZeroTargetSize("width"));
        }
        if height == Some(0) {
            return Err(PipelineError::ZeroTargetSize("height"));
        }

        let prefix = overrides
            .prefix
            .clone()
            .unwrap_or_else(|| config.prefix.clone());
        if !is_c_identifier(&prefix) {
            return Err(PipelineError::InvalidPrefix(prefix));
        }

        Ok(Self {
            depth,
            dither,
            width,
            height,
            prefix,
            bracket_style,
        })
    }

    /// Target size for a source of `source_width` x `source_height`.
    pub fn target_size(&self, source_width: usize, source_height: usize) -> (usize, usize) {
        (
            self.width.unwrap_or(source_width),
            self.height.unwrap_or(source_height),
        )
    }
}

impl Default for ReformSettings {
    fn default() -> Self {
        Self {
            depth: ColorDepth::Eight,
            dither: None,
            width: None,
            height: None,
            prefix: "image".to_string(),
            bracket_style: BracketStyle::SameLine,
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
