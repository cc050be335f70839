use thiserror::Error;

/// Errors returned by the smoothing, statistics and history routines.
///
/// A series without a single known value is not an error: interpolation
/// reports it through its boolean result and smoothing passes it through.
#[derive(Debug, Error)]
pub enum Error {
	/// Requested gap filling policy does not exist.
	#[error("unsupported missing value policy: {0:?} (supported: \"linear\")")]
	UnsupportedPolicy(String),

	/// Not enough samples for the requested statistic.
	#[error("insufficient data: need at least {needed} values, found {found}")]
	InsufficientData {
		needed: usize,
		found: usize,
	},

	/// Confidence level outside the open interval (0, 1).
	#[error("invalid confidence level {0}, expected a value in (0, 1)")]
	InvalidConfidence(f64),

	/// No series with this name is stored in the history.
	#[error("unknown metric {0:?}")]
	UnknownMetric(String),

	/// Metric name cannot be stored in the requested format.
	#[error("invalid metric name {0:?}")]
	InvalidMetricName(String),

	/// Malformed history file content.
	#[error("parse error in line {line}: {message}")]
	Parse {
		line: usize,
		message: String,
	},

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[cfg(feature="rust-hdf5")]
	#[error(transparent)]
	Hdf5(#[from] hdf5::Error),
}

pub type Result<T> = std::result::Result<T, Error>;


#[test]
fn test_error_messages() {
	assert_eq!(
		Error::UnsupportedPolicy("cubic".to_string()).to_string(),
		"unsupported missing value policy: \"cubic\" (supported: \"linear\")"
	);
	assert_eq!(
		Error::InsufficientData{needed: 2, found: 1}.to_string(),
		"insufficient data: need at least 2 values, found 1"
	);
	assert_eq!(Error::UnknownMetric("loss".to_string()).to_string(), "unknown metric \"loss\"");
}
