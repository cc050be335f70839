use std::fmt;
use std::str::FromStr;

use ndarray::{ArrayBase, DataMut, Ix1};

use crate::error::{Error, Result};
use crate::float::CurveFloat;


/// How gaps in a series are filled before smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
	/// Straight line between the nearest known neighbours, constant beyond
	/// the first and last known value.
	#[default]
	Linear,
}
impl FromStr for MissingPolicy {
	type Err = Error;
	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"linear" => Ok(MissingPolicy::Linear),
			_ => Err(Error::UnsupportedPolicy(s.to_string())),
		}
	}
}
impl fmt::Display for MissingPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MissingPolicy::Linear => write!(f, "linear"),
		}
	}
}
impl MissingPolicy {
	pub fn fill<F: CurveFloat>(&self, values: &mut [Option<F>]) -> bool {
		match self {
			MissingPolicy::Linear => interpolate(values),
		}
	}
}


pub fn has_missing<F>(values: &[Option<F>]) -> bool {
	values.iter().any(Option::is_none)
}

/// Fills every missing position by linear interpolation between its nearest
/// known neighbours. Positions before the first (after the last) known value
/// take that value.
///
/// Returns `false` and leaves `values` untouched if no position is known.
/// An empty slice counts as filled.
pub fn interpolate<F: CurveFloat>(values: &mut [Option<F>]) -> bool {
	let n = values.len();
	if n == 0 { return true; }
	let (i_first, i_last) = match (
		values.iter().position(Option::is_some),
		values.iter().rposition(Option::is_some),
	) {
		(Some(i_first), Some(i_last)) => (i_first, i_last),
		_ => return false,
	};
	/* Nearest known index at or before / at or after each position */
	let mut prev_known = vec![i_first; n];
	let mut next_known = vec![i_last; n];
	let mut last_seen = i_first;
	for i in 0..n {
		if values[i].is_some() { last_seen = i; }
		prev_known[i] = last_seen;
	}
	let mut last_seen = i_last;
	for i in (0..n).rev() {
		if values[i].is_some() { last_seen = i; }
		next_known[i] = last_seen;
	}
	for i in 0..n {
		if values[i].is_some() { continue; }
		let (i_prev, i_next) = (prev_known[i], next_known[i]);
		let v_prev = values[i_prev].unwrap_or_else(F::nan);
		let v_next = values[i_next].unwrap_or_else(F::nan);
		/* Edge runs resolve to the same neighbour on both sides */
		values[i] = Some(if i_prev == i_next {
			v_prev
		} else {
			/* In f64 so long gaps stay finite for narrow float types */
			let frac = F::from_f64((i-i_prev) as f64 / (i_next-i_prev) as f64).unwrap_or_else(F::nan);
			v_prev + frac * (v_next - v_prev)
		});
	}
	true
}

/// Same as [`interpolate`] with `NaN` marking missing positions.
pub fn interpolate_nan<F: CurveFloat, S: DataMut<Elem=F>>(values: &mut ArrayBase<S, Ix1>) -> bool {
	let mut buffer: Vec<Option<F>> = values.iter()
	.map(|&v| if v.is_nan() { None } else { Some(v) })
	.collect();
	if !has_missing(&buffer) { return true; }
	if !interpolate(&mut buffer) { return false; }
	values.iter_mut()
	.zip(buffer.into_iter())
	.for_each(|(target, v)| if let Some(v) = v { *target = v; });
	true
}


#[cfg(test)]
fn assert_close(actual: &[Option<f64>], expected: &[f64]) {
	assert_eq!(actual.len(), expected.len());
	actual.iter().zip(expected.iter()).for_each(|(a, e)| {
		let a = a.expect("position left unfilled");
		assert!((a-e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
	});
}

#[test]
fn test_interpolate_edges_and_interior() {
	let mut values = vec![None, None, Some(5.0), None, None, Some(10.0), None];
	assert!(interpolate(&mut values));
	assert_close(&values, &[5.0, 5.0, 5.0, 5.0+5.0/3.0, 5.0+10.0/3.0, 10.0, 10.0]);
}

#[test]
fn test_interpolate_single_gap() {
	let mut values = vec![Some(1.0), None, Some(3.0), None, None, None, Some(-1.0)];
	assert!(interpolate(&mut values));
	assert_close(&values, &[1.0, 2.0, 3.0, 2.0, 1.0, 0.0, -1.0]);
}

#[test]
fn test_interpolate_all_missing() {
	let mut values: Vec<Option<f64>> = vec![None; 6];
	assert!(!interpolate(&mut values));
	assert!(values.iter().all(Option::is_none));
}

#[test]
fn test_interpolate_empty_and_single() {
	let mut empty: Vec<Option<f32>> = vec![];
	assert!(interpolate(&mut empty));
	let mut single = vec![None, Some(2.5f32), None];
	assert!(interpolate(&mut single));
	assert_eq!(single, vec![Some(2.5), Some(2.5), Some(2.5)]);
}

#[test]
fn test_interpolate_complete_is_noop() {
	/* Parameters */
	let n_values = 500;
	/* Additional imports */
	use ndarray_rand::rand::random;
	/* Initialize objects */
	let original: Vec<Option<f64>> = (0..n_values).map(|_| Some(random::<f64>())).collect();
	let mut values = original.clone();
	assert!(interpolate(&mut values));
	assert_eq!(values, original);
	assert!(interpolate(&mut values));
	assert_eq!(values, original);
}

#[test]
fn test_interpolate_random_gaps_stay_between_neighbours() {
	/* Parameters */
	let n_values = 1000;
	let missing_rate = 0.4;
	/* Additional imports */
	use ndarray_rand::rand::random;
	/* Initialize objects */
	let original: Vec<Option<f64>> = (0..n_values)
	.map(|_| if random::<f64>() < missing_rate { None } else { Some(random::<f64>()) })
	.collect();
	let mut values = original.clone();
	let any_known = original.iter().any(Option::is_some);
	assert_eq!(interpolate(&mut values), any_known);
	if !any_known { return; }
	let known_min = original.iter().flatten().cloned().fold(f64::INFINITY, f64::min);
	let known_max = original.iter().flatten().cloned().fold(f64::NEG_INFINITY, f64::max);
	values.iter().zip(original.iter()).for_each(|(v, o)| {
		let v = v.unwrap();
		if let Some(o) = o { assert_eq!(v, *o); }
		assert!(v >= known_min-1e-12 && v <= known_max+1e-12);
	});
}

#[test]
fn test_interpolate_nan_array() {
	use ndarray::{array, Array1};
	let mut arr: Array1<f64> = array![f64::NAN, 2.0, f64::NAN, 4.0, f64::NAN];
	assert!(interpolate_nan(&mut arr));
	assert_eq!(arr, array![2.0, 2.0, 3.0, 4.0, 4.0]);
	let mut all_nan: Array1<f32> = Array1::from_elem(4, f32::NAN);
	assert!(!interpolate_nan(&mut all_nan));
	assert!(all_nan.iter().all(|v| v.is_nan()));
}

#[test]
fn test_policy_parsing() {
	assert_eq!("linear".parse::<MissingPolicy>().unwrap(), MissingPolicy::Linear);
	assert_eq!(" Linear ".parse::<MissingPolicy>().unwrap(), MissingPolicy::Linear);
	assert!(matches!("spline".parse::<MissingPolicy>(), Err(Error::UnsupportedPolicy(p)) if p == "spline"));
	assert_eq!(MissingPolicy::default().to_string(), "linear");
}

#[cfg(feature="half")]
#[test]
fn test_interpolate_long_gap_in_half_precision() {
	use half::f16;
	/* Gap wider than the largest finite f16 */
	let n_values = 70_000;
	let mut values: Vec<Option<f16>> = vec![None; n_values];
	values[0] = Some(f16::from_f32(0.0));
	values[n_values-1] = Some(f16::from_f32(1.0));
	assert!(interpolate(&mut values));
	assert!(values.iter().all(|v| v.map_or(false, |v| v.is_finite())));
	let middle = values[n_values/2].unwrap().to_f32();
	assert!((middle-0.5).abs() < 1e-2);
}
