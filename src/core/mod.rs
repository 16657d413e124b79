//! Core types shared across artibind
//!
//! The core module holds the error vocabulary used at every boundary of the
//! crate. The binding engine in [`crate::replacer`] never returns errors; the
//! types here are produced by manifest loading, artifact pool loading,
//! configuration and the command-line front end.
//!
//! # Error Handling Pattern
//!
//! ```rust,no_run
//! use artibind::core::{ArtibindError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn load() -> Result<()> {
//!     Err(ArtibindError::InvalidManifest {
//!         reason: "document is a sequence".to_string(),
//!     }
//!     .into())
//! }
//!
//! if let Err(e) = load() {
//!     user_friendly_error(e).display();
//! }
//! ```

pub mod error;

pub use error::{ArtibindError, ErrorContext, user_friendly_error};
