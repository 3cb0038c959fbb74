//! Library error type.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("error walking directory: {0}")]
	WalkDir(#[from] walkdir::Error),
	#[error("parsing error: {0}")]
	Parse(String),
	#[error("manifest error: {0}")]
	Manifest(#[from] crate::manifest::ManifestError),
	/// The resolver could not satisfy the declared dependencies.
	#[error("resolution failed: {0}")]
	Resolution(#[from] crate::resolver::ResolveError),
	/// A resolved request depends on something missing from the resolved set.
	///
	/// This means the resolver's output is inconsistent and is never recovered from.
	#[error("unresolved dependency found during sorting - {0}")]
	UnresolvedDependency(String),
	/// Fetching or installing a single package failed, the remaining packages were not installed.
	#[error("installation failed: {0}")]
	Installation(#[from] crate::installer::InstallError),
	#[error("request set has not been resolved yet.")]
	NotResolved,
}
