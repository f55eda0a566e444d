//! Configuration errors.

use thiserror::Error;

/// Result of validating a field configuration.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Reasons a [`FieldConfig`](crate::FieldConfig) is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// A numeric parameter lies outside its allowed range.
	#[error("{field} = {value} is out of range, expected {expected}")]
	OutOfRange {
		field: &'static str,
		value: f64,
		expected: &'static str,
	},

	/// A `min`/`max` pair where `min` exceeds `max`.
	#[error("{field} range is inverted: min {min} > max {max}")]
	InvertedRange {
		field: &'static str,
		min: f64,
		max: f64,
	},

	/// Particles need at least one color.
	#[error("palette must contain at least one color")]
	EmptyPalette,

	/// The embedded JSON document could not be parsed.
	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
