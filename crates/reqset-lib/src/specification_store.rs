//! The record of installed package specifications inside a directory.
//!
//! Each installed package has a `<dir>/specifications/<full_name>.json` file.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::package::Specification;

pub const SPECIFICATIONS_DIR: &str = "specifications";
const SPECIFICATION_EXTENSION: &str = "json";

pub fn specification_path(dir: &Path, spec: &Specification) -> PathBuf {
	dir.join(SPECIFICATIONS_DIR).join(format!("{}.{}", spec.full_name(), SPECIFICATION_EXTENSION))
}

/// Loads a single specification file.
pub fn load(path: impl AsRef<Path>) -> crate::Result<Specification> {
	let file = std::fs::File::open(path)?;
	Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

/// Writes `spec` into the store of `dir`, returning the file written.
pub fn save(dir: &Path, spec: &Specification) -> std::io::Result<PathBuf> {
	let path = specification_path(dir, spec);
	std::fs::create_dir_all(path.with_file_name(""))?;
	let mut writer = std::io::BufWriter::new(std::fs::File::create(&path)?);
	serde_json::to_writer_pretty(&mut writer, spec)?;
	writer.flush()?;
	Ok(path)
}

/// Every specification stored in `dir`, sorted by file name.
///
/// A directory without a store holds no specifications.
pub fn specs_in(dir: impl AsRef<Path>) -> crate::Result<Vec<Specification>> {
	let store = dir.as_ref().join(SPECIFICATIONS_DIR);
	if !store.is_dir() {
		log::debug!("No specification store at {}", store.display());
		return Ok(Vec::new());
	}

	let mut specs = Vec::<Specification>::new();
	for entry in walkdir::WalkDir::new(&store).min_depth(1).max_depth(1).sort_by_file_name() {
		let entry = entry?;
		let is_spec = entry.file_type().is_file()
			&& entry.path().extension().is_some_and(|e| e == SPECIFICATION_EXTENSION);
		if is_spec {
			log::trace!("Loading specification {}", entry.path().display());
			specs.push(load(entry.path())?);
		}
	}

	Ok(specs)
}
