use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;


/// Writes a file through a hidden sibling `.<name>.<i>.tmp` and renames it
/// over the target once writing succeeded, so the target is either the old
/// or the complete new content.
pub struct AtomicFileWriter {
	target: PathBuf,
	tmp: PathBuf,
}
impl AtomicFileWriter {
	pub fn new<P: AsRef<Path>>(target: P) -> Self {
		let target = target.as_ref().to_path_buf();
		let tmp = Self::free_tmp_path(&target);
		Self{target, tmp}
	}

	fn free_tmp_path(target: &Path) -> PathBuf {
		let dir = target.parent().unwrap_or_else(|| Path::new(""));
		let name = target.file_name()
		.map(|n| n.to_string_lossy().into_owned())
		.unwrap_or_default();
		(0usize..)
		.map(|i| dir.join(format!(".{}.{}.tmp", name, i)))
		.find(|candidate| !candidate.exists())
		.unwrap_or_else(|| dir.join(format!(".{}.tmp", name)))
	}

	pub fn target(&self) -> &Path { &self.target }
	pub fn tmp_path(&self) -> &Path { &self.tmp }

	/// Runs `write` against the temporary path and moves the result into
	/// place. If writing or renaming fails the temporary file is removed and
	/// the target is left alone.
	pub fn finish_with<T, W: FnOnce(&Path) -> Result<T>>(self, write: W) -> Result<T> {
		match write(&self.tmp) {
			Ok(value) => match fs::rename(&self.tmp, &self.target) {
				Ok(()) => Ok(value),
				Err(e) => {
					let _ = fs::remove_file(&self.tmp);
					Err(e.into())
				},
			},
			Err(e) => {
				let _ = fs::remove_file(&self.tmp);
				Err(e)
			},
		}
	}
}


#[cfg(test)]
pub(crate) fn scratch_dir(tag: &str) -> PathBuf {
	use ndarray_rand::rand::random;
	let dir = std::env::temp_dir().join(format!("curvesmooth-{}-{:016x}", tag, random::<u64>()));
	fs::create_dir_all(&dir).unwrap();
	dir
}

#[test]
fn test_tmp_path_is_hidden_sibling() {
	let dir = scratch_dir("tmp-name");
	let writer = AtomicFileWriter::new(dir.join("history.csv"));
	assert_eq!(writer.tmp_path(), dir.join(".history.csv.0.tmp"));
	fs::write(dir.join(".history.csv.0.tmp"), b"stale").unwrap();
	let writer = AtomicFileWriter::new(dir.join("history.csv"));
	assert_eq!(writer.tmp_path(), dir.join(".history.csv.1.tmp"));
	fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_finish_replaces_target() {
	let dir = scratch_dir("replace");
	let target = dir.join("out.txt");
	fs::write(&target, b"old").unwrap();
	AtomicFileWriter::new(&target)
	.finish_with(|tmp| Ok(fs::write(tmp, b"new")?))
	.unwrap();
	assert_eq!(fs::read_to_string(&target).unwrap(), "new");
	assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
	fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_failed_write_keeps_target() {
	use crate::error::Error;
	let dir = scratch_dir("fail");
	let target = dir.join("out.txt");
	fs::write(&target, b"old").unwrap();
	let result: Result<()> = AtomicFileWriter::new(&target).finish_with(|tmp| {
		fs::write(tmp, b"partial")?;
		Err(Error::UnknownMetric("boom".to_string()))
	});
	assert!(result.is_err());
	assert_eq!(fs::read_to_string(&target).unwrap(), "old");
	assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
	fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_failed_rename_removes_tmp() {
	let dir = scratch_dir("rename");
	/* A non-empty directory cannot be replaced by a file */
	let target = dir.join("occupied");
	fs::create_dir_all(target.join("inner")).unwrap();
	let writer = AtomicFileWriter::new(&target);
	let tmp = writer.tmp_path().to_path_buf();
	let result = writer.finish_with(|tmp| Ok(fs::write(tmp, b"new")?));
	assert!(result.is_err());
	assert!(!tmp.exists());
	assert!(target.join("inner").is_dir());
	fs::remove_dir_all(&dir).unwrap();
}
