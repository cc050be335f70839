#[cfg(feature="progressbars")]
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
#[cfg(feature="progressbars")]
use std::fmt::Write;
#[cfg(feature="parallel")]
use rayon::prelude::*;
use std::iter::{ExactSizeIterator, Iterator};


macro_rules! trait_combiner {
	($combination_name: ident) => {
		pub trait $combination_name {}
		impl<T> $combination_name for T {}
	};
	($combination_name: ident: $t: ident $(+ $ts: ident)*) => {
		pub trait $combination_name: $t $(+ $ts)* {}
		impl<T: $t $(+ $ts)*> $combination_name for T {}
	};
}
pub(crate) use trait_combiner;

#[cfg(feature="parallel")]
trait_combiner!(MaybeSync: Sync);
#[cfg(not(feature="parallel"))]
trait_combiner!(MaybeSync);
#[cfg(feature="parallel")]
trait_combiner!(MaybeSend: Send);
#[cfg(not(feature="parallel"))]
trait_combiner!(MaybeSend);


/// Iterator adapter ticking an indicatif bar once per yielded series.
#[cfg(feature="progressbars")]
pub struct SeriesProgress<I: ExactSizeIterator> {
	iter: I,
	bar: ProgressBar
}
#[cfg(feature="progressbars")]
impl<I: ExactSizeIterator> SeriesProgress<I> {
	pub fn new(iter: I, msg: &str) -> Self {
		let bar = ProgressBar::new(iter.len() as u64);
		if let Ok(style) = ProgressStyle::with_template("{msg}: [{wide_bar:.green/white}] {pos}/{len} series ({elapsed_precise}, eta {eta})") {
			bar.set_style(
				style.with_key("eta", |state: &ProgressState, w: &mut dyn Write| { let _ = write!(w, "{:.1}s", state.eta().as_secs_f64()); })
			);
		}
		bar.set_message(msg.to_string());
		SeriesProgress{iter, bar}
	}
}
#[cfg(feature="progressbars")]
impl<I: ExactSizeIterator> Iterator for SeriesProgress<I> {
	type Item=I::Item;
	fn next(&mut self) -> Option<Self::Item> {
		let item = self.iter.next();
		match item {
			Some(_) => self.bar.inc(1),
			None => self.bar.finish(),
		}
		item
	}
}
#[cfg(feature="progressbars")]
impl<I: ExactSizeIterator> ExactSizeIterator for SeriesProgress<I> {
	fn len(&self) -> usize { self.iter.len() }
}


pub fn named_iter<I: ExactSizeIterator>(iter: I, _msg: &str) -> impl ExactSizeIterator<Item=I::Item> {
	let ret = iter;
	#[cfg(feature="progressbars")]
	let ret = SeriesProgress::new(ret, _msg);
	ret
}
#[cfg(feature="parallel")]
pub fn named_par_iter<I: ExactSizeIterator+Send>(iter: I, msg: &str) -> impl ParallelIterator<Item=I::Item> where I::Item: Send {
	named_iter(iter, msg).par_bridge()
}
#[cfg(not(feature="parallel"))]
pub fn named_par_iter<I: ExactSizeIterator>(iter: I, msg: &str) -> impl ExactSizeIterator<Item=I::Item> {
	named_iter(iter, msg)
}


#[test]
fn test_named_iter_yields_everything() {
	let items = vec![3usize, 1, 4, 1, 5];
	let collected: Vec<usize> = named_iter(items.clone().into_iter(), "Collecting").collect();
	assert_eq!(collected, items);
}

#[test]
fn test_named_par_iter_visits_everything() {
	let total: usize = named_par_iter(0..100usize, "Summing").map(|i| i*2).sum();
	assert_eq!(total, 9900);
}
