//! Gap filling and sliding window smoothing for training curves.
//!
//! Metric series recorded during training often skip epochs (validation
//! every few epochs, restarted runs). [`smooth`] fills such gaps by linear
//! interpolation and averages every position over a centred window, which
//! is what the plotting and reporting side wants to draw.

mod progress;
mod float;
mod files;
pub mod error;
pub mod interpolate;
pub mod window;
pub mod smooth;
pub mod stats;
pub mod table;
pub mod history;

#[cfg(feature="python")]
mod pybridge;

pub use error::{Error, Result};
pub use files::AtomicFileWriter;
pub use float::CurveFloat;
pub use history::MetricHistory;
pub use interpolate::{MissingPolicy, has_missing, interpolate, interpolate_nan};
pub use progress::{MaybeSend, MaybeSync};
pub use smooth::{DEFAULT_RADIUS, SmoothingConfig, smooth, smooth_nan, smooth_rows, smooth_with};
pub use stats::{mean, mean_confidence_interval, standard_error};
pub use table::AlignedTextTable;
pub use window::{sliding_window_average, sliding_window_average_arr, sliding_window_average_naive};
