use pyo3::prelude::*;
use pyo3::types::PyList;
use pyo3::exceptions::PyValueError;
#[cfg(not(feature="parallel"))]
use pyo3::exceptions::PyWarning;
use numpy::{PyArray1,PyArray2,PyReadonlyArray1,PyReadonlyArray2,PyReadwriteArray1,ToPyArray};
use paste::paste;
#[cfg(feature="parallel")]
use rayon::ThreadPoolBuilder;
#[cfg(feature="half")]
use half::f16;

use crate::error::Error;
use crate::interpolate::{interpolate, interpolate_nan};
use crate::smooth::{DEFAULT_RADIUS, SmoothingConfig, smooth_nan, smooth_rows, smooth_with};
use crate::stats::mean_confidence_interval;


impl From<Error> for PyErr {
	fn from(e: Error) -> Self {
		PyValueError::new_err(e.to_string())
	}
}


/// Fills `None` entries of a Python list in place. Returns `False` if the
/// list holds no number at all.
#[pyfunction]
#[pyo3(name = "interpolate")]
pub fn py_interpolate(values: &PyList) -> PyResult<bool> {
	let mut buffer: Vec<Option<f64>> = values.extract()?;
	let filled = interpolate(&mut buffer);
	if filled {
		for (i, v) in buffer.into_iter().enumerate() {
			values.set_item(i, v)?;
		}
	}
	Ok(filled)
}

#[pyfunction]
#[pyo3(name = "smooth", signature = (values, radius=DEFAULT_RADIUS, missing_policy="linear"))]
pub fn py_smooth(values: Vec<Option<f64>>, radius: usize, missing_policy: &str) -> PyResult<Vec<Option<f64>>> {
	Ok(smooth_with(&values, radius, missing_policy)?)
}

#[pyfunction]
#[pyo3(name = "mean_confidence_interval", signature = (data, confidence=0.95))]
pub fn py_mean_confidence_interval(data: Vec<f64>, confidence: f64) -> PyResult<(f64, f64)> {
	Ok(mean_confidence_interval(&data, confidence)?)
}


macro_rules! array_functions_gen {
	(@single $prec_type: ty) => {
		paste! {
			#[pyfunction]
			pub fn [<interpolate_array_ $prec_type>](mut values: PyReadwriteArray1<$prec_type>) -> bool {
				interpolate_nan(&mut values.as_array_mut())
			}
			#[pyfunction]
			#[pyo3(signature = (values, radius=DEFAULT_RADIUS))]
			pub fn [<smooth_array_ $prec_type>]<'py>(py: Python<'py>, values: PyReadonlyArray1<$prec_type>, radius: usize) -> &'py PyArray1<$prec_type> {
				let config = SmoothingConfig::new().with_radius(radius);
				smooth_nan(&values.as_array(), &config).to_pyarray(py)
			}
			#[pyfunction]
			#[pyo3(signature = (series, radius=DEFAULT_RADIUS))]
			pub fn [<smooth_rows_ $prec_type>]<'py>(py: Python<'py>, series: PyReadonlyArray2<$prec_type>, radius: usize) -> &'py PyArray2<$prec_type> {
				let config = SmoothingConfig::new().with_radius(radius);
				smooth_rows(&series.as_array(), &config).to_pyarray(py)
			}
		}
	};
	($($prec_type: ty),*) => {
		$(array_functions_gen!(@single $prec_type);)*
	};
}
array_functions_gen!(f32, f64);
#[cfg(feature="half")]
array_functions_gen!(f16);
macro_rules! array_functions_export {
	($module: ident, ($($pts:ty),*)) => {
		$(array_functions_export!($module, $pts);)*
	};
	($module: ident, $prec_type: ty) => {
		paste!{
			$module.add_function(wrap_pyfunction!([<interpolate_array_ $prec_type>], $module)?)?;
			$module.add_function(wrap_pyfunction!([<smooth_array_ $prec_type>], $module)?)?;
			$module.add_function(wrap_pyfunction!([<smooth_rows_ $prec_type>], $module)?)?;
		}
	};
}


#[pyfunction]
pub fn limit_threads(_num_threads: usize) -> Result<(), PyErr> {
	#[cfg(feature="parallel")]
	{
		ThreadPoolBuilder::new()
		.num_threads(_num_threads)
		.build_global()
		.map_err(|e| PyErr::new::<PyValueError,_>(e.to_string()))
	}
	#[cfg(not(feature="parallel"))]
	Err(PyErr::new::<PyWarning,_>("Number of threads could not be set, because this package was built without multi-threading."))
}


/* Declaration of the python package generated by maturin. */
#[pymodule]
fn curvesmooth(_py: Python, m: &PyModule) -> PyResult<()> {
	m.add_function(wrap_pyfunction!(py_interpolate, m)?)?;
	m.add_function(wrap_pyfunction!(py_smooth, m)?)?;
	m.add_function(wrap_pyfunction!(py_mean_confidence_interval, m)?)?;
	array_functions_export!(m, (f32, f64));
	#[cfg(feature="half")]
	array_functions_export!(m, f16);
	m.add_wrapped(wrap_pyfunction!(limit_threads))?;
	Ok(())
}


#[test]
fn test_py_smooth_rejects_unknown_policy() {
	pyo3::prepare_freethreaded_python();
	Python::with_gil(|py| {
		let err = py_smooth(vec![Some(1.0), None], 2, "spline").unwrap_err();
		assert!(err.is_instance_of::<PyValueError>(py));
		assert_eq!(py_smooth(vec![Some(1.0), None, Some(3.0)], 0, "linear").unwrap(), vec![Some(1.0), Some(2.0), Some(3.0)]);
	});
}

#[test]
fn test_py_interpolate_mutates_list() {
	pyo3::prepare_freethreaded_python();
	Python::with_gil(|py| {
		let list = PyList::new(py, vec![None, Some(1.0), None, Some(3.0)]);
		assert!(py_interpolate(list).unwrap());
		let filled: Vec<f64> = list.extract().unwrap();
		assert_eq!(filled, vec![1.0, 1.0, 2.0, 3.0]);
		let empty_values: Vec<Option<f64>> = vec![None, None];
		let list = PyList::new(py, empty_values);
		assert!(!py_interpolate(list).unwrap());
	});
}
