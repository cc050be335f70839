use probability::{distribution::Beta, prelude::Inverse};

use crate::error::{Error, Result};


pub fn mean(data: &[f64]) -> Option<f64> {
	if data.is_empty() { return None; }
	Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Standard error of the mean, using the unbiased sample deviation.
pub fn standard_error(data: &[f64]) -> Result<f64> {
	let n = data.len();
	if n < 2 { return Err(Error::InsufficientData{needed: 2, found: n}); }
	let mu = data.iter().sum::<f64>() / n as f64;
	let var = data.iter().map(|v| (v-mu)*(v-mu)).sum::<f64>() / (n-1) as f64;
	Ok((var / n as f64).sqrt())
}

/// Upper two-sided Student t quantile for `dof` degrees of freedom.
///
/// Uses P(|T| > t) = I_x(dof/2, 1/2) with x = dof / (dof + t^2).
fn student_t_two_sided(confidence: f64, dof: usize) -> f64 {
	let dof = dof as f64;
	let x = Beta::new(dof/2.0, 0.5, 0.0, 1.0).inverse(1.0-confidence);
	(dof * (1.0-x) / x).sqrt()
}

/// Student t confidence interval `(low, high)` around the sample mean.
pub fn mean_confidence_interval(data: &[f64], confidence: f64) -> Result<(f64, f64)> {
	if !(confidence > 0.0 && confidence < 1.0) {
		return Err(Error::InvalidConfidence(confidence));
	}
	let sem = standard_error(data)?;
	let mu = data.iter().sum::<f64>() / data.len() as f64;
	let h = sem * student_t_two_sided(confidence, data.len()-1);
	Ok((mu-h, mu+h))
}


#[test]
fn test_student_t_quantiles() {
	/* Reference values from standard t tables */
	[(0.95, 1, 12.7062), (0.95, 9, 2.2622), (0.99, 4, 4.6041), (0.90, 30, 1.6973)]
	.iter()
	.for_each(|&(c, dof, t)| {
		let q = student_t_two_sided(c, dof);
		assert!((q-t).abs() < 1e-3, "t({}, {}) = {} != {}", c, dof, q, t);
	});
}

#[test]
fn test_mean_confidence_interval() {
	let data: Vec<f64> = (1..=10).map(|v| v as f64).collect();
	let (lo, hi) = mean_confidence_interval(&data, 0.95).unwrap();
	assert!((lo-3.3341).abs() < 1e-3);
	assert!((hi-7.6659).abs() < 1e-3);
	assert!(((lo+hi)/2.0 - mean(&data).unwrap()).abs() < 1e-12);
}

#[test]
fn test_confidence_interval_errors() {
	assert!(matches!(mean_confidence_interval(&[1.0], 0.95), Err(Error::InsufficientData{needed: 2, found: 1})));
	assert!(matches!(mean_confidence_interval(&[1.0, 2.0], 1.0), Err(Error::InvalidConfidence(_))));
	assert!(matches!(mean_confidence_interval(&[1.0, 2.0], f64::NAN), Err(Error::InvalidConfidence(_))));
	assert_eq!(mean(&[]), None);
}

#[test]
fn test_constant_data_has_zero_width() {
	let (lo, hi) = mean_confidence_interval(&[4.0; 8], 0.95).unwrap();
	assert_eq!((lo, hi), (4.0, 4.0));
}
