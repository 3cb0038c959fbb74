//! User configuration.

use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

const CONFIG_FILE_NAME: &str = "config.json";

/// Settings shared by the fetcher and installer.
///
/// Stored as JSON in the data directory, see [`load_from_disk()`](Config::load_from_disk()).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
	data_dir: PathBuf,
	/// Where specifications are additionally registered when an install is not scoped to its directory.
	system_dir: PathBuf,
	https_only: bool,
	do_checksums: bool,
}

impl Default for Config {
	fn default() -> Self {
		let data_dir = default_data_dir();
		Self {
			system_dir: data_dir.join("system"),
			data_dir,
			https_only: true,
			do_checksums: true,
		}
	}
}

fn default_data_dir() -> PathBuf {
	#[cfg(target_os = "windows")]
	let path = std::env::var_os("APPDATA").map(PathBuf::from).unwrap_or_default();

	#[cfg(not(target_os = "windows"))]
	let path = if let Some(e) = std::env::var_os("XDG_DATA_HOME") {
		PathBuf::from(e)
	} else {
		std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default().join(".local/share")
	};

	path.join("reqset")
}

impl Config {
	/// Loads the config from the default data directory.
	///
	/// # Errors
	/// - [`IO`](crate::Error::IO) when the file is missing or unreadable.
	/// - [`SerdeJSON`](crate::Error::SerdeJSON) when the file is malformed.
	pub fn load_from_disk() -> crate::Result<Self> {
		Self::load_from_file(default_data_dir().join(CONFIG_FILE_NAME))
	}

	pub fn load_from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	/// Saves the config into its data directory, creating the directory if needed.
	pub fn save_to_disk(&self) -> crate::Result<()> {
		std::fs::create_dir_all(&self.data_dir)?;
		let file = std::fs::File::create(self.data_dir.join(CONFIG_FILE_NAME))?;
		serde_json::to_writer_pretty(file, self)?;
		Ok(())
	}

	pub fn data_dir(&self) -> &Path {
		&self.data_dir
	}
	/// returns if the directory is valid or not.
	pub fn set_data_dir(&mut self, data_dir: PathBuf) -> bool {
		if data_dir.is_dir() {
			self.data_dir = data_dir;
			true
		} else {
			false
		}
	}

	pub fn system_dir(&self) -> &Path {
		&self.system_dir
	}
	pub fn set_system_dir(&mut self, system_dir: PathBuf) {
		self.system_dir = system_dir;
	}

	pub fn https_only(&self) -> bool {
		self.https_only
	}
	pub fn set_https_only(&mut self, https_only: bool) {
		self.https_only = https_only;
	}

	pub fn do_checksums(&self) -> bool {
		self.do_checksums
	}
	pub fn set_do_checksums(&mut self, do_checksums: bool) {
		self.do_checksums = do_checksums;
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn config_survives_disk_round_trip() {
		let dir = tempfile::tempdir().expect("failed to create temp dir.");
		let mut config = Config::default();
		assert!(config.set_data_dir(dir.path().to_path_buf()));
		config.set_https_only(false);
		config.save_to_disk().expect("failed to save config.");

		let loaded = Config::load_from_file(dir.path().join(CONFIG_FILE_NAME)).expect("failed to load config.");
		assert_eq!(loaded, config);
	}

	#[test]
	fn missing_data_dir_is_rejected() {
		let mut config = Config::default();
		let before = config.data_dir().to_path_buf();
		assert!(!config.set_data_dir(PathBuf::from("/this/path/should/not/exist")));
		assert_eq!(config.data_dir(), before);
	}
}
