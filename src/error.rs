use thiserror::Error;

pub type Result<T> = std::result::Result<T, RleError>;

#[derive(Error, Debug)]
pub enum RleError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Formatting error: {0}")]
	Fmt(#[from] std::fmt::Error),

	#[error("Malformed tilemap document: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Value {value} at index {index} does not fit in a byte")]
	ValueOutOfRange { index: usize, value: i64 },

	#[error("Truncated stream: block at offset {offset} needs {needed} more bytes, {available} available")]
	TruncatedStream { offset: usize, needed: usize, available: usize },

	#[error("{trailing} bytes of trailing data after terminator at offset {offset}")]
	TrailingDataAfterTerminator { offset: usize, trailing: usize },

	#[error("Invalid tilemap: {0}")]
	InvalidTilemap(String),

	#[error("Round-trip verification failed: {0}")]
	VerificationFailed(String),

	#[error("Configuration error: {0}")]
	ConfigError(String),
}
