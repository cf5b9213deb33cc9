//! Error types for the identity canvas.

use std::fmt;

/// Errors raised by the particle core and its browser glue.
#[derive(Clone, Debug, PartialEq)]
pub enum IdentityError {
	/// A call was made with arguments it cannot work with (no image, zero count).
	InvalidArgument(String),
	/// An artwork image failed to load or its pixels could not be read.
	Load(String),
	/// A colour string was not `rgb()`, `rgba()`, or hex notation.
	Parse(String),
	/// The JSON configuration was malformed or out of range.
	Config(String),
	/// A drawing call on the surface failed.
	Render(String),
}

impl fmt::Display for IdentityError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			IdentityError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
			IdentityError::Load(msg) => write!(f, "Failed to load image: {}", msg),
			IdentityError::Parse(msg) => write!(f, "Could not parse color: {}", msg),
			IdentityError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
			IdentityError::Render(msg) => write!(f, "Render failed: {}", msg),
		}
	}
}

impl std::error::Error for IdentityError {}

impl From<serde_json::Error> for IdentityError {
	fn from(e: serde_json::Error) -> Self {
		IdentityError::Config(e.to_string())
	}
}

/// Result type used throughout the canvas.
pub type Result<T> = std::result::Result<T, IdentityError>;
