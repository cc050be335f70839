use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

#[cfg(feature="rust-hdf5")]
use ndarray::Array1;

use crate::error::{Error, Result};
use crate::files::AtomicFileWriter;
use crate::smooth::{SmoothingConfig, smooth};
use crate::table::AlignedTextTable;


/// Epoch numbers in a history file may skip rows, but not by more than this
/// factor over the number of data rows.
pub const MAX_EPOCHS_PER_ROW: usize = 64;

/// Named per-epoch metric series. All series share one length; epochs where
/// a metric was not recorded hold `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricHistory {
	metrics: BTreeMap<String, Vec<Option<f64>>>,
	n_epochs: usize,
}
impl MetricHistory {
	pub fn new() -> Self { Self::default() }

	pub fn n_epochs(&self) -> usize { self.n_epochs }
	pub fn is_empty(&self) -> bool { self.metrics.is_empty() }
	pub fn metric_names(&self) -> impl Iterator<Item=&str> {
		self.metrics.keys().map(String::as_str)
	}
	pub fn series(&self, metric: &str) -> Option<&[Option<f64>]> {
		self.metrics.get(metric).map(Vec::as_slice)
	}

	fn grow_to(&mut self, n_epochs: usize) {
		if n_epochs <= self.n_epochs { return; }
		self.n_epochs = n_epochs;
		self.metrics.values_mut().for_each(|series| series.resize(n_epochs, None));
	}

	fn series_mut(&mut self, metric: &str) -> &mut Vec<Option<f64>> {
		let n_epochs = self.n_epochs;
		self.metrics.entry(metric.to_string()).or_insert_with(|| vec![None; n_epochs])
	}

	/// Stores `value` for `metric` at `epoch`, overwriting an earlier value.
	pub fn record(&mut self, epoch: usize, metric: &str, value: f64) {
		self.grow_to(epoch+1);
		self.series_mut(metric)[epoch] = Some(value);
	}

	/// Appends one epoch holding the given values and returns its index.
	pub fn push_epoch<'a, I: IntoIterator<Item=(&'a str, f64)>>(&mut self, values: I) -> usize {
		let epoch = self.n_epochs;
		self.grow_to(epoch+1);
		values.into_iter().for_each(|(metric, value)| self.series_mut(metric)[epoch] = Some(value));
		epoch
	}

	/// Replaces a whole series, padding the shorter side with missing values.
	pub fn insert_series(&mut self, metric: &str, mut values: Vec<Option<f64>>) {
		self.grow_to(values.len());
		values.resize(self.n_epochs, None);
		self.metrics.insert(metric.to_string(), values);
	}

	pub fn smoothed(&self, metric: &str, config: &SmoothingConfig) -> Result<Vec<Option<f64>>> {
		self.series(metric)
		.map(|series| smooth(series, config))
		.ok_or_else(|| Error::UnknownMetric(metric.to_string()))
	}

	/// One row per metric: known points, last value, last smoothed value and
	/// the minimum over known values.
	pub fn summary_table(&self, config: &SmoothingConfig) -> AlignedTextTable {
		let mut table = AlignedTextTable::new(true);
		["metric", "points", "last", "smoothed", "best"].iter().for_each(|h| table.add_cell(h));
		let fmt_value = |v: Option<f64>| v.map(|v| format!("{:.6}", v)).unwrap_or_else(|| "-".to_string());
		self.metrics.iter().for_each(|(name, series)| {
			let known = series.iter().flatten().copied();
			let last = series.iter().rev().flatten().next().copied();
			let best = known.clone().fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))));
			let smoothed_last = smooth(series, config).last().copied().flatten();
			table.new_row();
			table.add_cell(name);
			table.add_cell(known.count());
			table.add_cell(fmt_value(last));
			table.add_cell(fmt_value(smoothed_last));
			table.add_cell(fmt_value(best));
		});
		table
	}

	fn check_metric_names<B: Fn(&str) -> bool>(&self, is_bad: B) -> Result<()> {
		match self.metrics.keys().find(|name| is_bad(name.as_str())) {
			Some(bad) => Err(Error::InvalidMetricName(bad.clone())),
			None => Ok(()),
		}
	}

	/// Writes `epoch,<metric>...` rows, empty cells for missing values.
	pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		/* The loader splits on ',' and trims every header cell */
		self.check_metric_names(|name| name.contains(|c: char| c == ',' || c == '\n' || c == '\r') || name.trim() != name)?;
		AtomicFileWriter::new(path).finish_with(|tmp| {
			let mut out = BufWriter::new(File::create(tmp)?);
			write!(out, "epoch")?;
			for name in self.metrics.keys() {
				write!(out, ",{}", name)?;
			}
			writeln!(out)?;
			for epoch in 0..self.n_epochs {
				write!(out, "{}", epoch)?;
				for series in self.metrics.values() {
					match series[epoch] {
						Some(v) => write!(out, ",{}", v)?,
						None => write!(out, ",")?,
					}
				}
				writeln!(out)?;
			}
			out.flush()?;
			Ok(())
		})
	}

	pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
		let content = fs::read_to_string(path)?;
		let mut lines = content.lines().enumerate().filter(|(_, line)| !line.trim().is_empty());
		let (_, header) = lines.next().ok_or_else(|| Error::Parse{line: 1, message: "missing header".to_string()})?;
		let mut columns = header.split(',');
		if columns.next().map(str::trim) != Some("epoch") {
			return Err(Error::Parse{line: 1, message: "header must start with \"epoch\"".to_string()});
		}
		let names: Vec<String> = columns.map(|c| c.trim().to_string()).collect();
		let lines: Vec<(usize, &str)> = lines.collect();
		let max_epoch = lines.len().saturating_mul(MAX_EPOCHS_PER_ROW);
		let mut history = Self::new();
		names.iter().for_each(|name| { history.series_mut(name); });
		for &(i_line, line) in lines.iter() {
			let parse_err = |message: String| Error::Parse{line: i_line+1, message};
			let cells: Vec<&str> = line.split(',').map(str::trim).collect();
			if cells.len() != names.len()+1 {
				return Err(parse_err(format!("expected {} cells, found {}", names.len()+1, cells.len())));
			}
			let epoch: usize = cells[0].parse().map_err(|e| parse_err(format!("bad epoch {:?}: {}", cells[0], e)))?;
			if epoch >= max_epoch {
				return Err(parse_err(format!("epoch {} out of range for {} data rows", epoch, lines.len())));
			}
			history.grow_to(epoch+1);
			for (name, cell) in names.iter().zip(cells[1..].iter()) {
				if cell.is_empty() { continue; }
				let value: f64 = cell.parse().map_err(|e| parse_err(format!("bad value {:?}: {}", cell, e)))?;
				history.record(epoch, name, value);
			}
		}
		Ok(history)
	}

	/// Like [`MetricHistory::load_csv`] but starts over with an empty history
	/// if the file is missing or broken.
	pub fn load_csv_or_default<P: AsRef<Path>>(path: P) -> Self {
		Self::load_csv(path).unwrap_or_default()
	}

	/// One `f64` dataset per metric, `NaN` for missing values.
	#[cfg(feature="rust-hdf5")]
	pub fn save_h5<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		/* '/' would nest groups instead of naming a dataset */
		self.check_metric_names(|name| name.is_empty() || name.contains('/'))?;
		AtomicFileWriter::new(path).finish_with(|tmp| {
			let file = hdf5::File::create(tmp)?;
			for (name, series) in self.metrics.iter() {
				let data: Array1<f64> = series.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
				file.new_dataset_builder().with_data(&data).create(name.as_str())?;
			}
			Ok(())
		})
	}

	#[cfg(feature="rust-hdf5")]
	pub fn load_h5<P: AsRef<Path>>(path: P) -> Result<Self> {
		let file = hdf5::File::open(path)?;
		let mut history = Self::new();
		for name in file.member_names()? {
			let data: Array1<f64> = file.dataset(&name)?.read_1d::<f64>()?;
			let series = data.iter().map(|&v| if v.is_nan() { None } else { Some(v) }).collect();
			history.insert_series(&name, series);
		}
		Ok(history)
	}
}


#[cfg(test)]
fn sample_history() -> MetricHistory {
	let mut history = MetricHistory::new();
	(0..9).for_each(|epoch| {
		history.record(epoch, "loss", 1.0 / (epoch+1) as f64);
		if epoch % 3 == 2 {
			history.record(epoch, "val_loss", 2.0 / (epoch+1) as f64);
		}
	});
	history
}

#[test]
fn test_record_pads_all_series() {
	let mut history = MetricHistory::new();
	history.record(2, "loss", 0.5);
	history.record(0, "acc", 0.1);
	assert_eq!(history.n_epochs(), 3);
	assert_eq!(history.series("loss").unwrap(), &[None, None, Some(0.5)]);
	assert_eq!(history.series("acc").unwrap(), &[Some(0.1), None, None]);
	let epoch = history.push_epoch([("loss", 0.25)]);
	assert_eq!(epoch, 3);
	assert_eq!(history.series("acc").unwrap().len(), 4);
	assert_eq!(history.metric_names().collect::<Vec<&str>>(), vec!["acc", "loss"]);
}

#[test]
fn test_smoothed_metric() {
	let history = sample_history();
	let config = SmoothingConfig::new().with_radius(1);
	let smoothed = history.smoothed("val_loss", &config).unwrap();
	assert_eq!(smoothed.len(), 9);
	assert!(smoothed.iter().all(Option::is_some));
	assert!(matches!(history.smoothed("accuracy", &config), Err(Error::UnknownMetric(m)) if m == "accuracy"));
}

#[test]
fn test_summary_table() {
	let mut history = sample_history();
	history.insert_series("never", vec![None; 2]);
	let lines = history.summary_table(&SmoothingConfig::default()).lines();
	assert_eq!(lines.len(), 4);
	assert!(lines[0].starts_with("metric"));
	assert!(lines[1].starts_with("loss"));
	assert!(lines[1].contains("0.111111"));
	assert!(lines[2].starts_with("never"));
	assert!(lines[2].trim_end().ends_with("-"));
	assert!(lines[3].starts_with("val_loss"));
	assert!(lines[3].contains(" 3 "));
}

#[test]
fn test_csv_roundtrip_keeps_gaps() {
	use crate::files::scratch_dir;
	let dir = scratch_dir("history-csv");
	let path = dir.join("history.csv");
	let history = sample_history();
	history.save_csv(&path).unwrap();
	let content = fs::read_to_string(&path).unwrap();
	assert!(content.starts_with("epoch,loss,val_loss\n0,1,\n"));
	assert_eq!(MetricHistory::load_csv(&path).unwrap(), history);
	fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_csv_errors() {
	use crate::files::scratch_dir;
	let dir = scratch_dir("history-bad");
	let path = dir.join("history.csv");
	fs::write(&path, "epoch,loss\n0,0.5\n1,abc\n").unwrap();
	assert!(matches!(MetricHistory::load_csv(&path), Err(Error::Parse{line: 3, ..})));
	fs::write(&path, "step,loss\n").unwrap();
	assert!(matches!(MetricHistory::load_csv(&path), Err(Error::Parse{line: 1, ..})));
	assert!(matches!(MetricHistory::load_csv(dir.join("missing.csv")), Err(Error::Io(_))));
	assert!(MetricHistory::load_csv_or_default(dir.join("missing.csv")).is_empty());
	let mut history = MetricHistory::new();
	history.record(0, "a,b", 1.0);
	assert!(matches!(history.save_csv(&path), Err(Error::InvalidMetricName(_))));
	fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_csv_rejects_far_epochs() {
	use crate::files::scratch_dir;
	let dir = scratch_dir("history-epoch");
	let path = dir.join("history.csv");
	fs::write(&path, "epoch,loss\n99999999999999,1\n").unwrap();
	assert!(matches!(MetricHistory::load_csv(&path), Err(Error::Parse{line: 2, ..})));
	assert!(MetricHistory::load_csv_or_default(&path).is_empty());
	fs::write(&path, format!("epoch,loss\n{},1\n", usize::MAX)).unwrap();
	assert!(matches!(MetricHistory::load_csv(&path), Err(Error::Parse{line: 2, ..})));
	/* Skipped epochs within the limit are padded */
	fs::write(&path, "epoch,loss\n0,1\n10,2\n").unwrap();
	let history = MetricHistory::load_csv(&path).unwrap();
	assert_eq!(history.n_epochs(), 11);
	assert_eq!(history.series("loss").unwrap()[10], Some(2.0));
	fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_csv_rejects_untrimmed_names() {
	use crate::files::scratch_dir;
	let dir = scratch_dir("history-names");
	let path = dir.join("history.csv");
	let mut history = MetricHistory::new();
	history.record(0, " loss", 1.0);
	assert!(matches!(history.save_csv(&path), Err(Error::InvalidMetricName(n)) if n == " loss"));
	let mut history = MetricHistory::new();
	history.record(0, "val loss", 1.0);
	history.save_csv(&path).unwrap();
	assert_eq!(MetricHistory::load_csv(&path).unwrap(), history);
	fs::remove_dir_all(&dir).unwrap();
}

#[cfg(feature="rust-hdf5")]
#[test]
fn test_h5_rejects_nested_names() {
	use crate::files::scratch_dir;
	let dir = scratch_dir("history-h5-names");
	let mut history = MetricHistory::new();
	history.record(0, "train/loss", 1.0);
	assert!(matches!(history.save_h5(dir.join("history.h5")), Err(Error::InvalidMetricName(_))));
	assert!(!dir.join("history.h5").exists());
	fs::remove_dir_all(&dir).unwrap();
}

#[cfg(feature="rust-hdf5")]
#[test]
fn test_h5_roundtrip() {
	use crate::files::scratch_dir;
	let dir = scratch_dir("history-h5");
	let path = dir.join("history.h5");
	let history = sample_history();
	history.save_h5(&path).unwrap();
	assert_eq!(MetricHistory::load_h5(&path).unwrap(), history);
	fs::remove_dir_all(&dir).unwrap();
}
