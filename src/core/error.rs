//! Error handling for artibind
//!
//! This module provides the error types and user-friendly error reporting for
//! artibind. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Where errors come from
//!
//! The binding engine itself never fails: an absent field, a malformed image
//! reference, an unsupported scale target or a scoping mismatch simply produce
//! no candidate or no bind. Errors only originate at the edges of the crate:
//! - **Loading**: [`ArtibindError::ManifestParseError`], [`ArtibindError::InvalidManifest`],
//!   [`ArtibindError::ArtifactPoolParseError`]
//! - **Configuration**: [`ArtibindError::ConfigError`], [`ArtibindError::InvalidBindingMode`]
//! - **Collaborators**: [`ArtibindError::ResourceCrashed`] reported by a provider
//!   after the rewritten manifest was submitted
//!
//! Common library errors are converted automatically:
//! - [`std::io::Error`] → [`ArtibindError::IoError`]
//! - [`serde_json::Error`] → [`ArtibindError::JsonError`]
//! - [`serde_yaml::Error`] → [`ArtibindError::YamlError`]
//! - [`toml::de::Error`] → [`ArtibindError::TomlError`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use artibind::core::{ArtibindError, ErrorContext};
//!
//! let context = ErrorContext::new(ArtibindError::InvalidBindingMode {
//!     mode: "match-everything".to_string(),
//! })
//! .with_suggestion("Use 'match-name-and-tag' or 'match-name-only'");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for artibind operations
///
/// Each variant describes one failure at the boundary of the binding engine:
/// reading manifests and artifact pools, loading configuration, or reporting
/// a failure surfaced by the provider the manifest was submitted to.
#[derive(Error, Debug)]
pub enum ArtibindError {
    /// A manifest document could not be parsed
    ///
    /// # Fields
    /// - `source_name`: Where the document came from (file path or `<stdin>`)
    /// - `reason`: The parser's description of the problem
    #[error("Invalid manifest syntax in {source_name}: {reason}")]
    ManifestParseError {
        /// File path or label of the document that failed to parse
        source_name: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// A parsed document is not a manifest object
    #[error("Invalid manifest: {reason}")]
    InvalidManifest {
        /// Why the document cannot be used as a manifest
        reason: String,
    },

    /// The artifact pool file could not be parsed
    #[error("Invalid artifact list in {file}: {reason}")]
    ArtifactPoolParseError {
        /// Path to the artifact pool file
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Unknown docker image binding mode
    #[error("Unknown docker image binding mode: {mode}")]
    InvalidBindingMode {
        /// The mode string that was rejected
        mode: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// A resource started from a bound manifest crashed instead of running
    ///
    /// Providers report this after submission; the binder only carries the
    /// typed error upward so callers can present it.
    #[error("Failed to start '{name}' which instead crashed")]
    ResourceCrashed {
        /// Name of the resource that crashed
        name: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for ArtibindError {
    fn clone(&self) -> Self {
        match self {
            Self::ManifestParseError {
                source_name,
                reason,
            } => Self::ManifestParseError {
                source_name: source_name.clone(),
                reason: reason.clone(),
            },
            Self::InvalidManifest {
                reason,
            } => Self::InvalidManifest {
                reason: reason.clone(),
            },
            Self::ArtifactPoolParseError {
                file,
                reason,
            } => Self::ArtifactPoolParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::InvalidBindingMode {
                mode,
            } => Self::InvalidBindingMode {
                mode: mode.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::ResourceCrashed {
                name,
            } => Self::ResourceCrashed {
                name: name.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::YamlError(e) => Self::Other {
                message: format!("YAML error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps an [`ArtibindError`] and adds optional details and a
/// suggestion for resolving it. When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context in yellow (optional)
/// 3. **Suggestion**: Actionable steps in green (optional)
///
/// # Examples
///
/// ```rust,no_run
/// use artibind::core::{ArtibindError, ErrorContext};
///
/// let context = ErrorContext::new(ArtibindError::ConfigError {
///     message: "unknown key".to_string(),
/// })
/// .with_details("artibind reads ~/.artibind/config.toml by default");
///
/// println!("{}", context);
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ArtibindError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: ArtibindError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`ArtibindError`] variants anywhere in the `anyhow` chain, plain
/// [`std::io::Error`]s, and parser errors. Anything else is wrapped as
/// [`ArtibindError::Other`] with the full context chain as its message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(artibind_error) = cause.downcast_ref::<ArtibindError>() {
            let mut context = create_error_context(artibind_error.clone());
            // Keep the outer context (usually the file being processed) in the message
            if error.to_string() != artibind_error.to_string() {
                context.error = ArtibindError::Other {
                    message: format!("{error:#}"),
                };
            }
            return context;
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        let context = ErrorContext::new(ArtibindError::Other {
            message: format!("{error:#}"),
        });
        return match io_error.kind() {
            std::io::ErrorKind::NotFound => context
                .with_suggestion("Check that the file exists and the path is correct"),
            std::io::ErrorKind::PermissionDenied => {
                context.with_suggestion("Check the file permissions and ownership")
            }
            _ => context,
        };
    }

    if error.downcast_ref::<serde_yaml::Error>().is_some()
        || error.downcast_ref::<serde_json::Error>().is_some()
    {
        return ErrorContext::new(ArtibindError::Other {
            message: format!("{error:#}"),
        })
        .with_suggestion("Check the document syntax; manifests may be YAML or JSON");
    }

    ErrorContext::new(ArtibindError::Other {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: ArtibindError) -> ErrorContext {
    match &error {
        ArtibindError::ManifestParseError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the manifest syntax; documents may be YAML or JSON")
            .with_details("Multi-document YAML streams are split on '---' separators"),
        ArtibindError::InvalidManifest {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Each document must be a mapping with at least 'kind' and 'metadata'"),
        ArtibindError::ArtifactPoolParseError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion(
                "The artifact file must contain a list of objects with 'type', 'name' and 'reference'",
            ),
        ArtibindError::InvalidBindingMode {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use 'match-name-and-tag' (default) or 'match-name-only'"),
        ArtibindError::ConfigError {
            ..
        }
        | ArtibindError::TomlError(_) => ErrorContext::new(error)
            .with_suggestion("Check the configuration file syntax")
            .with_details("artibind reads ~/.artibind/config.toml unless --config is given"),
        ArtibindError::ResourceCrashed {
            ..
        } => ErrorContext::new(error)
            .with_details("The provider accepted the manifest but the resource did not reach a running state"),
        _ => ErrorContext::new(error),
    }
}
