//! Package payload extraction.

use std::path::{Path, PathBuf};

use crate::specification_store;

use super::*;

/// Installs gzipped tarball payloads.
///
/// Files go to `<install_dir>/packages/<full_name>/` and the specification is registered in the
/// store of `install_dir`. When an install is not scoped to its directory the specification is
/// also registered in the system directory.
#[derive(Debug, Clone, Default)]
pub struct ArchiveInstaller {
	system_dir: Option<PathBuf>,
}

impl ArchiveInstaller {
	pub fn new(system_dir: Option<PathBuf>) -> Self {
		Self { system_dir }
	}

	pub fn from_config(config: &crate::Config) -> Self {
		Self::new(Some(config.system_dir().to_path_buf()))
	}

	pub fn package_dir(install_dir: &Path, spec: &Specification) -> PathBuf {
		install_dir.join("packages").join(spec.full_name())
	}
}

impl PackageInstaller for ArchiveInstaller {
	fn install(&self, payload: &Path, spec: &Specification, options: &InstallOptions) -> Result<(), InstallError> {
		let destination = Self::package_dir(&options.install_dir, spec);
		log::debug!("Extracting {} to {}", payload.display(), destination.display());

		/* A forced reinstall replaces the previous contents */
		if destination.exists() {
			std::fs::remove_dir_all(&destination)?;
		}
		std::fs::create_dir_all(&destination)?;

		let file = std::fs::File::open(payload)?;
		let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(std::io::BufReader::new(file)));
		archive.unpack(&destination)?;

		specification_store::save(&options.install_dir, spec)?;

		if !options.only_install_dir {
			if let Some(system_dir) = &self.system_dir {
				log::debug!("Registering {} in {}", spec.full_name(), system_dir.display());
				specification_store::save(system_dir, spec)?;
			}
		}

		Ok(())
	}
}
