//! Configuration types for block layout and rendering.
//!
//! All types implement [`serde::Deserialize`] and every field has a default,
//! so a configuration file only needs to mention the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Metrics used by the layout passes (notch height, scale, spacing).
//! - [`StyleConfig`] - Colors used by the SVG snapshot renderer.
//! - [`load_config`] - Finds and loads a TOML configuration file.
//!
//! # Example
//!
//! ```
//! # use brickwork::config::AppConfig;
//! let config = AppConfig::from_toml_str("[layout]\nnotch_height = 6.0\nscale = 2.0").unwrap();
//! assert_eq!(config.layout().notch_height(), 12.0);
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use brickwork_core::{color::Color, geometry::Insets, text::TextStyle};

use crate::BrickworkError;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Validation`] for out-of-range values.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.layout.validate()?;
        Ok(config)
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Splits the configuration into its layout and style sections.
    pub fn into_parts(self) -> (LayoutConfig, StyleConfig) {
        (self.layout, self.style)
    }
}

/// Metrics shared by every layout pass of a workspace.
///
/// Lengths are stored unscaled. Getters return values multiplied by
/// [`scale`](Self::scale), which is what the layout passes work with.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical overlap between consecutive blocks in a stack.
    notch_height: f32,

    /// Global zoom factor.
    scale: f32,

    /// Horizontal gap between fields of the same input.
    field_spacing: f32,

    /// Room between a block's outline and its inputs.
    block_padding: Insets,

    /// Minimum x offset of a statement input's nested stack.
    statement_indent: f32,

    /// Height kept by a statement input with nothing plugged in.
    empty_statement_height: f32,

    label_font_family: String,

    /// Label font size in points at scale 1.
    label_font_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            notch_height: 4.0,
            scale: 1.0,
            field_spacing: 4.0,
            block_padding: Insets::new(4.0, 8.0, 4.0, 8.0),
            statement_indent: 16.0,
            empty_statement_height: 24.0,
            label_font_family: String::from("sans-serif"),
            label_font_size: 14.0,
        }
    }
}

impl LayoutConfig {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn notch_height(&self) -> f32 {
        self.notch_height * self.scale
    }

    pub fn field_spacing(&self) -> f32 {
        self.field_spacing * self.scale
    }

    pub fn block_padding(&self) -> Insets {
        self.block_padding.scale(self.scale)
    }

    pub fn statement_indent(&self) -> f32 {
        self.statement_indent * self.scale
    }

    pub fn empty_statement_height(&self) -> f32 {
        self.empty_statement_height * self.scale
    }

    /// Label style at scale 1. Measurers and views apply the scale themselves.
    pub fn label_style(&self) -> TextStyle {
        TextStyle::new(self.label_font_family.clone(), self.label_font_size)
    }

    pub fn with_notch_height(mut self, notch_height: f32) -> Self {
        self.notch_height = notch_height;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_field_spacing(mut self, field_spacing: f32) -> Self {
        self.field_spacing = field_spacing;
        self
    }

    pub fn with_block_padding(mut self, block_padding: Insets) -> Self {
        self.block_padding = block_padding;
        self
    }

    pub fn with_statement_indent(mut self, statement_indent: f32) -> Self {
        self.statement_indent = statement_indent;
        self
    }

    pub fn with_empty_statement_height(mut self, height: f32) -> Self {
        self.empty_statement_height = height;
        self
    }

    pub(crate) fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::Validation(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if self.notch_height < 0.0 {
            return Err(ConfigError::Validation(format!(
                "notch_height must not be negative, got {}",
                self.notch_height
            )));
        }
        Ok(())
    }
}

/// Colors used when rendering workspace snapshots.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    background_color: Option<String>,

    /// Fill for blocks that carry no color of their own.
    #[serde(default)]
    block_color: Option<String>,

    #[serde(default)]
    text_color: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.background_color.as_deref(), "background")
    }

    /// Returns the default block fill, falling back to a muted blue.
    pub fn block_color(&self) -> Result<Color, String> {
        parse_color(self.block_color.as_deref(), "block")
            .map(|color| color.unwrap_or_else(|| Color::new("#5b80a5").expect("valid CSS color")))
    }

    /// Returns the label text color, falling back to white.
    pub fn text_color(&self) -> Result<Color, String> {
        parse_color(self.text_color.as_deref(), "text")
            .map(|color| color.unwrap_or_else(|| Color::new("white").expect("valid CSS color")))
    }
}

fn parse_color(value: Option<&str>, what: &str) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {what} color in config: {err}"))
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (`brickwork/config.toml`)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns an error if an explicit path is given but does not exist, or if a
/// configuration file is found but cannot be read or parsed.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, BrickworkError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("brickwork/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("rs", "brickwork", "brickwork") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(
                path = system_config.display().to_string();
                "Loading configuration from system path"
            );
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, BrickworkError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    Ok(AppConfig::from_toml_str(&content)?)
}
