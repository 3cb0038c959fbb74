//! # Installation
//!
//! Installs the requests of a [`RequestSet`] into a directory one at a time in
//! installation order. Packages whose specification is already in the directory's
//! store are skipped, so running an install twice only installs once.
//!
//! The first package that fails to fetch or install stops the whole run. Packages
//! installed before it stay installed.

use std::collections::HashSet;
use std::path::Path;

use crate::installer::{Fetcher, InstallOptions, PackageInstaller};
use crate::specification_store;

use super::*;

impl RequestSet {
	/// Installs every request not already present in `dir`.
	///
	/// # Parameters
	/// - `dir` - The target directory, created if missing.
	/// - `force` - Skip the check for installed packages and install everything.
	/// - `fetcher` - Materializes each payload inside `dir`.
	/// - `installer` - Installs each payload into `dir` only.
	///
	/// # Returns
	/// The newly installed requests in installation order.
	///
	/// # Errors
	/// - [`NotResolved`](crate::Error::NotResolved) and [`UnresolvedDependency`](crate::Error::UnresolvedDependency) as [`sorted_requests()`](RequestSet::sorted_requests()).
	/// - [`Installation`](crate::Error::Installation) for the first package that failed.
	/// - [`IO`](crate::Error::IO), [`SerdeJSON`](crate::Error::SerdeJSON) or [`WalkDir`](crate::Error::WalkDir) when scanning the directory.
	pub fn install_into(&self, dir: impl AsRef<Path>, force: bool, fetcher: &impl Fetcher, installer: &impl PackageInstaller) -> crate::Result<Vec<&ResolvedRequest>> {
		let dir = dir.as_ref();
		let sorted = self.sorted_requests()?;

		let existing: HashSet<String> = if force {
			log::debug!("Forced install, not checking {} for installed packages.", dir.display());
			HashSet::new()
		} else {
			specification_store::specs_in(dir)?.iter().map(Specification::full_name).collect()
		};

		let dir = std::path::absolute(dir)?;
		std::fs::create_dir_all(&dir)?;

		let options = InstallOptions {
			install_dir: dir.clone(),
			only_install_dir: true,
		};

		let mut installed = Vec::<&ResolvedRequest>::new();

		for request in sorted {
			let full_name = request.full_name();
			if existing.contains(&full_name) {
				log::info!("{} already installed, skipping.", full_name);
				continue;
			}

			let payload = request.download(&dir, fetcher)?;
			installer.install(&payload, &request.spec, &options)?;
			log::info!("Installed {} into {}", full_name, dir.display());

			installed.push(request);
		}

		Ok(installed)
	}
}
