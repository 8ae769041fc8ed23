//! # SVGKit Common
//!
//! Error types and logging configuration shared by the SVGKit crates.
//!
//! ## Features
//!
//! - Unified error type for markup, model and configuration failures
//! - Logging configuration and setup
//! - Result and Option extension traits

use thiserror::Error;

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};

/// Unified error type for SVGKit.
///
/// The lenient parsing path never produces these: malformed markup is
/// skipped and unresolved references are treated as absent. They surface
/// from strict parsing, configuration loading and the tools.
#[derive(Error, Debug)]
pub enum SvgKitError {
    /// Markup the scanner could not make sense of.
    #[error("Markup error at byte {offset}: {message}")]
    Markup { message: String, offset: usize },

    /// An element name outside the supported SVG vocabulary.
    #[error("Unknown element: <{0}>")]
    UnknownElement(String),

    /// The document root is not an `<svg>` element.
    #[error("Root element is <{0}>, expected <svg>")]
    NonRootSvg(String),

    /// No element at all.
    #[error("Document contains no elements")]
    EmptyDocument,

    /// Elements nested deeper than the configured limit.
    #[error("Element nesting exceeds {0} levels")]
    NestingTooDeep(usize),

    /// A `url(#id)` or `href` that names nothing usable.
    #[error("Unresolved reference: #{0}")]
    UnresolvedReference(String),

    /// Configuration errors.
    #[error("Config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl SvgKitError {
    /// Create a markup error.
    pub fn markup(message: impl Into<String>, offset: usize) -> Self {
        Self::Markup {
            message: message.into(),
            offset,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error with source.
    pub fn config_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error came from the document content rather than the environment.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            SvgKitError::Markup { .. }
                | SvgKitError::UnknownElement(_)
                | SvgKitError::NonRootSvg(_)
                | SvgKitError::EmptyDocument
                | SvgKitError::NestingTooDeep(_)
                | SvgKitError::UnresolvedReference(_)
        )
    }

    /// Get the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            SvgKitError::Markup { .. } => "markup",
            SvgKitError::UnknownElement(_) => "unknown_element",
            SvgKitError::NonRootSvg(_) => "non_root_svg",
            SvgKitError::EmptyDocument => "empty_document",
            SvgKitError::NestingTooDeep(_) => "nesting_too_deep",
            SvgKitError::UnresolvedReference(_) => "unresolved_reference",
            SvgKitError::Config { .. } => "config",
            SvgKitError::Io(_) => "io",
            SvgKitError::NotFound(_) => "not_found",
        }
    }
}

/// Result type alias for SVGKit operations.
pub type Result<T> = std::result::Result<T, SvgKitError>;

/// Extension trait for Result.
pub trait ResultExt<T> {
    /// Wrap any error as a config error with context.
    fn config_context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn config_context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| SvgKitError::config_with_source(message, e))
    }
}

/// Extension trait for Option.
pub trait OptionExt<T> {
    /// Convert None to a NotFound error.
    fn ok_or_not_found(self, resource: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, resource: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| SvgKitError::NotFound(resource.into()))
    }
}
