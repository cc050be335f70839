use std::io::{self, Write};

use ndarray::Array1;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::StandardNormal;
use rand::prelude::*;

use curvesmooth::{MetricHistory, SmoothingConfig, mean_confidence_interval, sliding_window_average};


/* Noisy decaying loss; validation only every third epoch */
fn synthetic_history(n_epochs: usize, noise_scale: f64) -> MetricHistory {
	let mut rng = thread_rng();
	let noise: Array1<f64> = Array1::random(n_epochs, StandardNormal) * noise_scale;
	let mut history = MetricHistory::new();
	(0..n_epochs).for_each(|epoch| {
		let clean = (-(epoch as f64) / 15.0).exp();
		history.record(epoch, "loss", clean + noise[epoch]);
		if epoch % 3 == 2 {
			history.record(epoch, "val_loss", clean + 0.1 + rng.gen::<f64>() * noise_scale);
		}
	});
	history
}

fn print_curve(name: &str, values: &[Option<f64>]) {
	print!("{:>10}:", name);
	values.iter().for_each(|v| match v {
		Some(v) => print!(" {:>6.3}", v),
		None => print!(" {:>6}", "-"),
	});
	println!("");
}

fn main() -> curvesmooth::Result<()> {
	let n_epochs = 60;
	let config = SmoothingConfig::new().with_radius(3);

	print!("Generating history... "); _=io::stdout().flush();
	let history = synthetic_history(n_epochs, 0.05);
	println!("done");

	let smoothed_val = history.smoothed("val_loss", &config)?;
	if let Some(raw_val) = history.series("val_loss") {
		print_curve("val_loss", &raw_val[..12]);
	}
	print_curve("smoothed", &smoothed_val[..12]);
	println!("");

	print!("{}", history.summary_table(&config));
	println!("");

	if let Some(loss) = history.series("loss") {
		let tail: Vec<f64> = loss.iter().rev().take(10).flatten().copied().collect();
		let (lo, hi) = mean_confidence_interval(&tail, 0.95)?;
		println!("Last 10 epochs loss, 95% interval: [{:.4}, {:.4}]", lo, hi);
		let window_means = sliding_window_average(&tail, config.radius);
		println!("Window means over that tail: {:?}", window_means.iter().map(|v| format!("{:.4}", v)).collect::<Vec<String>>());
	}

	if let Some(path) = std::env::args().nth(1) {
		print!("Saving history to {}... ", path); _=io::stdout().flush();
		history.save_csv(&path)?;
		println!("done");
	}
	Ok(())
}
