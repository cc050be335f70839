use curvesmooth::{
	SmoothingConfig, interpolate, smooth, sliding_window_average, sliding_window_average_naive,
};
use proptest::prelude::*;

fn gappy_series() -> impl Strategy<Value=Vec<Option<f64>>> {
	prop::collection::vec(prop::option::weighted(0.6, -100.0f64..100.0), 0..60)
}

proptest! {
	#[test]
	fn prop_window_matches_naive(
		values in prop::collection::vec(-1000.0f64..1000.0, 0..200),
		radius in 0usize..30
	) {
		let fast = sliding_window_average(&values, radius);
		let slow = sliding_window_average_naive(&values, radius);
		prop_assert_eq!(fast.len(), values.len());
		for (a, b) in fast.iter().zip(slow.iter()) {
			prop_assert!((a-b).abs() < 1e-7, "{} != {}", a, b);
		}
	}

	#[test]
	fn prop_interpolate_complete_is_noop(values in prop::collection::vec(-100.0f64..100.0, 0..60)) {
		let original: Vec<Option<f64>> = values.into_iter().map(Some).collect();
		let mut filled = original.clone();
		prop_assert!(interpolate(&mut filled));
		prop_assert_eq!(&filled, &original);
		prop_assert!(interpolate(&mut filled));
		prop_assert_eq!(&filled, &original);
	}

	#[test]
	fn prop_interpolate_fills_or_leaves_untouched(values in gappy_series()) {
		let mut filled = values.clone();
		let any_known = values.iter().any(Option::is_some);
		prop_assert_eq!(interpolate(&mut filled), any_known || values.is_empty());
		if any_known {
			prop_assert!(filled.iter().all(Option::is_some));
			for (f, v) in filled.iter().zip(values.iter()) {
				if v.is_some() { prop_assert_eq!(f, v); }
			}
		} else {
			prop_assert_eq!(&filled, &values);
		}
	}

	#[test]
	fn prop_smooth_keeps_length_and_input(values in gappy_series(), radius in 0usize..10) {
		let before = values.clone();
		let config = SmoothingConfig::new().with_radius(radius);
		let smoothed = smooth(&values, &config);
		prop_assert_eq!(smoothed.len(), values.len());
		prop_assert_eq!(&values, &before);
		let any_known = values.iter().any(Option::is_some);
		prop_assert_eq!(smoothed.iter().all(Option::is_some), any_known || values.is_empty());
	}

	#[test]
	fn prop_smooth_stays_within_known_range(values in gappy_series(), radius in 0usize..10) {
		let known: Vec<f64> = values.iter().flatten().copied().collect();
		if !known.is_empty() {
			let lo = known.iter().cloned().fold(f64::INFINITY, f64::min);
			let hi = known.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
			let smoothed = smooth(&values, &SmoothingConfig::new().with_radius(radius));
			for v in smoothed.into_iter().flatten() {
				prop_assert!(v >= lo-1e-9 && v <= hi+1e-9);
			}
		}
	}
}

#[test]
fn test_documented_examples() {
	let mut values = vec![None, None, Some(5.0), None, None, Some(10.0), None];
	assert!(interpolate(&mut values));
	let expected: [f64; 7] = [5.0, 5.0, 5.0, 5.0+5.0/3.0, 5.0+10.0/3.0, 10.0, 10.0];
	values.iter().zip(expected.iter()).for_each(|(v, e)| assert!((v.unwrap()-e).abs() < 1e-12));

	let config = SmoothingConfig::new().with_radius(1);
	let values: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0, 5.0].iter().copied().map(Some).collect();
	assert_eq!(smooth(&values, &config), vec![Some(1.5), Some(2.0), Some(3.0), Some(4.0), Some(4.5)]);
	assert_eq!(smooth::<f64>(&[], &SmoothingConfig::default()), vec![]);
	assert_eq!(smooth(&[Some(1.0), Some(2.0)], &SmoothingConfig::new().with_radius(5)), vec![Some(1.5), Some(1.5)]);
}
