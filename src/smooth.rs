use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
#[cfg(feature="parallel")]
use rayon::iter::ParallelIterator;

use crate::error::Result;
use crate::float::CurveFloat;
use crate::interpolate::{MissingPolicy, has_missing, interpolate_nan};
use crate::progress::named_par_iter;
use crate::window::{sliding_window_average, sliding_window_average_arr};


pub const DEFAULT_RADIUS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothingConfig {
	pub radius: usize,
	pub policy: MissingPolicy,
}
impl Default for SmoothingConfig {
	fn default() -> Self {
		Self{radius: DEFAULT_RADIUS, policy: MissingPolicy::default()}
	}
}
impl SmoothingConfig {
	pub fn new() -> Self { Self::default() }
	pub fn with_radius(mut self, radius: usize) -> Self {
		self.radius = radius;
		self
	}
	pub fn with_policy(mut self, policy: MissingPolicy) -> Self {
		self.policy = policy;
		self
	}
	pub fn window_length(&self) -> usize { self.radius.saturating_mul(2).saturating_add(1) }
}


/// Fills gaps according to the configured policy and applies the sliding
/// window mean. Works on a copy; a series without any known value comes back
/// unchanged.
pub fn smooth<F: CurveFloat>(values: &[Option<F>], config: &SmoothingConfig) -> Vec<Option<F>> {
	let mut values = values.to_vec();
	if has_missing(&values) && !config.policy.fill(&mut values) {
		return values;
	}
	let filled: Vec<F> = values.into_iter().flatten().collect();
	sliding_window_average(&filled, config.radius)
	.into_iter()
	.map(Some)
	.collect()
}

/// [`smooth`] with the gap policy given by name. Unknown names are rejected
/// before looking at the data.
pub fn smooth_with<F: CurveFloat>(values: &[Option<F>], radius: usize, policy: &str) -> Result<Vec<Option<F>>> {
	let config = SmoothingConfig::new()
	.with_radius(radius)
	.with_policy(policy.parse()?);
	Ok(smooth(values, &config))
}

/// [`smooth`] for arrays marking missing positions with `NaN`.
pub fn smooth_nan<F: CurveFloat, D: Data<Elem=F>>(values: &ArrayBase<D, Ix1>, config: &SmoothingConfig) -> Array1<F> {
	let mut values = values.to_owned();
	let filled = match config.policy {
		MissingPolicy::Linear => interpolate_nan(&mut values),
	};
	if !filled { return values; }
	sliding_window_average_arr(&values, config.radius)
}

/// Smooths every row of `series` as an independent series.
pub fn smooth_rows<F: CurveFloat, D: Data<Elem=F>>(series: &ArrayBase<D, Ix2>, config: &SmoothingConfig) -> Array2<F> {
	let mut result = series.to_owned();
	let raw_iter = series.axis_iter(Axis(0))
	.zip(result.axis_iter_mut(Axis(0)));
	named_par_iter(raw_iter, "Smoothing series")
	.for_each(|(row, mut target)| {
		target.assign(&smooth_nan(&row, config));
	});
	result
}


#[test]
fn test_smooth_small_cases() {
	let config = SmoothingConfig::new().with_radius(1);
	let values: Vec<Option<f64>> = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
	assert_eq!(smooth(&values, &config), vec![Some(1.5), Some(2.0), Some(3.0), Some(4.0), Some(4.5)]);
	assert_eq!(smooth::<f64>(&[], &SmoothingConfig::default()), vec![]);
	let config = SmoothingConfig::new().with_radius(5);
	assert_eq!(smooth(&[Some(1.0), Some(2.0)], &config), vec![Some(1.5), Some(1.5)]);
}

#[test]
fn test_smooth_fills_then_averages() {
	let config = SmoothingConfig::new().with_radius(1);
	let values = vec![None, Some(2.0), None, Some(4.0), None];
	/* Filled: [2, 2, 3, 4, 4] */
	let smoothed = smooth(&values, &config);
	let expected: [f64; 5] = [2.0, 7.0/3.0, 3.0, 11.0/3.0, 4.0];
	smoothed.iter().zip(expected.iter()).for_each(|(a, e)| assert!((a.unwrap()-e).abs() < 1e-12));
	assert_eq!(values, vec![None, Some(2.0), None, Some(4.0), None]);
}

#[test]
fn test_smooth_huge_radius() {
	let config = SmoothingConfig::new().with_radius(usize::MAX);
	assert_eq!(config.window_length(), usize::MAX);
	assert_eq!(smooth(&[Some(1.0f64), None, Some(3.0)], &config), vec![Some(2.0), Some(2.0), Some(2.0)]);
	assert_eq!(smooth_with(&[Some(4.0f64)], usize::MAX, "linear").unwrap(), vec![Some(4.0)]);
}

#[test]
fn test_smooth_all_missing_passes_through() {
	let values: Vec<Option<f32>> = vec![None; 5];
	assert_eq!(smooth(&values, &SmoothingConfig::default()), values);
}

#[test]
fn test_smooth_with_policy_names() {
	let values = vec![Some(1.0), None, Some(3.0)];
	assert_eq!(smooth_with(&values, 0, "linear").unwrap(), vec![Some(1.0), Some(2.0), Some(3.0)]);
	assert!(smooth_with(&values, 0, "nearest").is_err());
	/* Rejected even when nothing needs filling */
	assert!(smooth_with(&[Some(1.0f64)], 2, "cubic").is_err());
}

#[test]
fn test_smooth_nan_matches_option_version() {
	/* Parameters */
	let n_values = 300;
	let missing_rate = 0.3;
	/* Additional imports */
	use ndarray_rand::rand::random;
	/* Initialize objects */
	let config = SmoothingConfig::new().with_radius(4);
	let options: Vec<Option<f64>> = (0..n_values)
	.map(|_| if random::<f64>() < missing_rate { None } else { Some(random::<f64>()) })
	.collect();
	let arr: Array1<f64> = options.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
	let from_options = smooth(&options, &config);
	let from_array = smooth_nan(&arr, &config);
	from_options.iter().zip(from_array.iter()).for_each(|(a, b)| match a {
		Some(a) => assert!((a-b).abs() < 1e-12),
		None => assert!(b.is_nan()),
	});
}

#[test]
fn test_smooth_rows_independent() {
	use ndarray::array;
	let config = SmoothingConfig::new().with_radius(1);
	let series: Array2<f64> = array![
		[1.0, 2.0, 3.0, 4.0, 5.0],
		[f64::NAN, 2.0, f64::NAN, 4.0, f64::NAN],
		[f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN],
	];
	let smoothed = smooth_rows(&series, &config);
	assert_eq!(smoothed.row(0).to_vec(), vec![1.5, 2.0, 3.0, 4.0, 4.5]);
	smoothed.row(1).iter()
	.zip([2.0, 7.0/3.0, 3.0, 11.0/3.0, 4.0].iter())
	.for_each(|(a, e)| assert!((a-e).abs() < 1e-12));
	assert!(smoothed.row(2).iter().all(|v| v.is_nan()));
}
