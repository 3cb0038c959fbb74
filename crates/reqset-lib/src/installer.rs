//! Fetching and installing single packages.
//!
//! The orchestration in [`RequestSet::install_into()`](crate::RequestSet::install_into()) only
//! talks to the [`Fetcher`] and [`PackageInstaller`] traits. [`DefaultFetcher`] and
//! [`ArchiveInstaller`] are the implementations used by the terminal front end.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::package::Specification;
use crate::request_set::PackageSource;

mod download;
pub use download::DefaultFetcher;

mod archive;
pub use archive::ArchiveInstaller;

/// Errors from fetching or installing a single package.
#[derive(Debug, Error)]
pub enum InstallError {
	/// The fetched payload hash does not match the hash of the source.
	#[error("downloaded content hash for {0} does not match the expected hash.")]
	DifferentHashes(String),
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("{0}")]
	Other(String),
}

/// Where and how an installer may write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
	pub install_dir: PathBuf,
	/// When set nothing is registered outside of `install_dir`.
	pub only_install_dir: bool,
}

/// Materializes a package payload at a local path.
pub trait Fetcher {
	fn fetch(&self, source: &PackageSource, destination: &Path) -> Result<(), InstallError>;
}

/// Installs one package payload into a directory.
pub trait PackageInstaller {
	fn install(&self, payload: &Path, spec: &Specification, options: &InstallOptions) -> Result<(), InstallError>;
}
