use ndarray::{Array1, ArrayBase, ArrayView1, Data, Ix1};

use crate::float::{CurveFloat, from_count};


/// Mean over the centred window `[i-radius, i+radius]` clipped to the series,
/// for every position `i`. Window length is `2*radius+1`.
pub fn sliding_window_average<F: CurveFloat>(values: &[F], radius: usize) -> Vec<F> {
	sliding_window_average_arr(&ArrayView1::from(values), radius).to_vec()
}

/// Array version of [`sliding_window_average`]. Keeps a running sum and count
/// so every position costs one addition and at most one subtraction.
pub fn sliding_window_average_arr<F: CurveFloat, D: Data<Elem=F>>(values: &ArrayBase<D, Ix1>, radius: usize) -> Array1<F> {
	let n = values.len();
	if n == 0 { return Array1::zeros(0); }
	if n <= radius {
		let mean = values.iter().copied().sum::<F>() / from_count(n);
		return Array1::from_elem(n, mean);
	}
	let mut result = Array1::zeros(n);
	/* Prime the window with everything right of position 0 except the entering element */
	let mut current_sum: F = values.iter().take(radius).copied().sum();
	let mut current_count = radius;
	for i in 0..n {
		if i > radius {
			current_sum -= values[i-radius-1];
			current_count -= 1;
		}
		if radius < n-i {
			current_sum += values[i+radius];
			current_count += 1;
		}
		result[i] = current_sum / from_count(current_count);
	}
	result
}

/// Direct O(n*radius) evaluation of the window mean.
pub fn sliding_window_average_naive<F: CurveFloat>(values: &[F], radius: usize) -> Vec<F> {
	let n = values.len();
	(0..n).map(|i| {
		let lo = i.saturating_sub(radius);
		let hi = i.saturating_add(radius).saturating_add(1).min(n);
		values[lo..hi].iter().copied().sum::<F>() / from_count(hi-lo)
	})
	.collect()
}


#[test]
fn test_window_small_cases() {
	assert_eq!(sliding_window_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 1), vec![1.5, 2.0, 3.0, 4.0, 4.5]);
	assert_eq!(sliding_window_average::<f64>(&[], 2), Vec::<f64>::new());
	assert_eq!(sliding_window_average(&[1.0, 2.0], 5), vec![1.5, 1.5]);
	assert_eq!(sliding_window_average(&[4.0f32, 8.0], 0), vec![4.0, 8.0]);
}

#[test]
fn test_window_radius_equals_length_minus_one() {
	/* Every window still spans the whole series */
	let values = [2.0, 4.0, 6.0, 8.0];
	let smoothed = sliding_window_average(&values, 3);
	assert_eq!(smoothed.len(), 4);
	smoothed.iter().for_each(|&v| assert!((v-5.0f64).abs() < 1e-12));
}

#[test]
fn test_window_huge_radius() {
	assert_eq!(sliding_window_average(&[1.0f64, 3.0], usize::MAX), vec![2.0, 2.0]);
	assert_eq!(sliding_window_average_naive(&[1.0f64, 3.0], usize::MAX), vec![2.0, 2.0]);
	assert_eq!(sliding_window_average(&[1.0f64, 3.0, 5.0], usize::MAX-1), vec![3.0, 3.0, 3.0]);
}

#[test]
fn test_window_matches_naive() {
	/* Parameters */
	let n_values = 2000;
	let radii = [0, 1, 2, 7, 50, 1999, 3000];
	/* Additional imports */
	use ndarray_rand::rand::random;
	/* Initialize objects */
	let values: Vec<f64> = (0..n_values).map(|_| random::<f64>()*100.0 - 50.0).collect();
	radii.iter().for_each(|&radius| {
		let fast = sliding_window_average(&values, radius);
		let slow = sliding_window_average_naive(&values, radius);
		fast.iter().zip(slow.iter()).for_each(|(a,b)| assert!((a-b).abs() < 1e-8, "radius {}: {} != {}", radius, a, b));
	});
}

#[test]
fn test_window_on_strided_view() {
	use ndarray::{s, Array1};
	let values: Array1<f64> = Array1::range(0.0, 10.0, 1.0);
	let every_other = values.slice(s![..;2]);
	let smoothed = sliding_window_average_arr(&every_other, 1);
	assert_eq!(smoothed.to_vec(), vec![1.0, 2.0, 4.0, 6.0, 7.0]);
}
