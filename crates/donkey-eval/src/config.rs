//! Evaluator configuration, read from the process environment.

use donkey_object::RenderStyle;
use thiserror::Error;

/// Selects how function values are rendered: `canonical` or `legacy`.
pub const RENDER_VAR: &str = "DONKEY_RENDER";
/// When set (to anything), `puts` writes nothing.
pub const SILENT_VAR: &str = "DONKEY_SILENT";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for DONKEY_RENDER (expected `canonical` or `legacy`)")]
    InvalidRenderStyle { value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Style used when values are rendered for output
    pub render_style: RenderStyle,
    /// Suppress host-visible output from builtins
    pub silent: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, so callers can layer their own sources.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let render_style = match lookup(RENDER_VAR) {
            Some(raw) => parse_render_style(&raw)?,
            None => RenderStyle::default(),
        };
        Ok(Self {
            render_style,
            silent: lookup(SILENT_VAR).is_some(),
        })
    }
}

pub fn parse_render_style(raw: &str) -> Result<RenderStyle, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "canonical" => Ok(RenderStyle::Canonical),
        "legacy" => Ok(RenderStyle::Legacy),
        _ => Err(ConfigError::InvalidRenderStyle { value: raw.to_string() }),
    }
}
