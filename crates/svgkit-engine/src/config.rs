//! Document and render options.

use serde::{Deserialize, Serialize};
use svgkit_common::{Result, ResultExt, SvgKitError};

/// Options applied when building and rendering a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Pixels per inch for `pt`, `pc`, `mm`, `cm`, `in`.
    pub dpi: f32,
    /// Font size in pixels that `em`/`ex` resolve against.
    pub font_size: f32,
    /// Maximum number of nested `use`/clip/mask/gradient references
    /// followed during one render.
    pub max_reference_depth: usize,
    /// Maximum element nesting kept by the builder and followed by the
    /// renderer. Deeper subtrees are dropped.
    pub max_nesting_depth: usize,
    /// Reject documents with markup diagnostics or unknown elements.
    pub strict: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 96.0,
            font_size: 16.0,
            max_reference_depth: 32,
            max_nesting_depth: 128,
            strict: false,
        }
    }
}

impl RenderOptions {
    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: RenderOptions =
            serde_json::from_str(json).config_context("invalid render options")?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            return Err(SvgKitError::config(format!("dpi must be positive, got {}", self.dpi)));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(SvgKitError::config(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        if self.max_reference_depth == 0 {
            return Err(SvgKitError::config("max_reference_depth must be at least 1"));
        }
        if self.max_nesting_depth == 0 {
            return Err(SvgKitError::config("max_nesting_depth must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.dpi, 96.0);
        assert_eq!(options.font_size, 16.0);
        assert_eq!(options.max_reference_depth, 32);
        assert_eq!(options.max_nesting_depth, 128);
        assert!(!options.strict);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let options = RenderOptions::from_json(r#"{"dpi": 72, "strict": true}"#).unwrap();
        assert_eq!(options.dpi, 72.0);
        assert!(options.strict);
        assert_eq!(options.font_size, 16.0);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = RenderOptions::from_json("{not json").unwrap_err();
        assert_eq!(err.category(), "config");

        let err = RenderOptions::from_json(r#"{"dpi": -1}"#).unwrap_err();
        assert!(err.to_string().contains("dpi"));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let options = RenderOptions {
            max_reference_depth: 0,
            ..Default::default()
        };
        assert!(options.validate().is_err());
        let options = RenderOptions {
            max_nesting_depth: 0,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }
}
