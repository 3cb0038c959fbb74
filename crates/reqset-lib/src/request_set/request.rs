use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::installer::{Fetcher, InstallError};
use crate::package::Specification;

/// Where the payload of a package can be obtained from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PackageSource {
	/// A payload already on this machine.
	Local {
		path: PathBuf,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		sha256: Option<String>,
	},
	/// A payload to download.
	Remote {
		url: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		sha256: Option<String>,
	},
}

impl PackageSource {
	pub fn local(path: impl Into<PathBuf>) -> Self {
		PackageSource::Local { path: path.into(), sha256: None }
	}

	pub fn remote(url: impl Into<String>) -> Self {
		PackageSource::Remote { url: url.into(), sha256: None }
	}

	/// Expected hex encoded SHA-256 of the payload, if known.
	pub fn sha256(&self) -> Option<&str> {
		match self {
			PackageSource::Local { sha256, .. } | PackageSource::Remote { sha256, .. } => sha256.as_deref(),
		}
	}
}

impl std::fmt::Display for PackageSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			PackageSource::Local { path, .. } => write!(f, "{}", path.display()),
			PackageSource::Remote { url, .. } => write!(f, "{}", url),
		}
	}
}

/// A version pinned package chosen by a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRequest {
	pub spec: Specification,
	pub source: PackageSource,
}

impl ResolvedRequest {
	pub fn new(spec: Specification, source: PackageSource) -> Self {
		Self { spec, source }
	}

	pub fn full_name(&self) -> String {
		self.spec.full_name()
	}

	/// Where [`download()`](ResolvedRequest::download()) places the payload inside `dir`.
	pub fn download_path(&self, dir: &Path) -> PathBuf {
		dir.join("cache").join(self.full_name() + ".tar.gz")
	}

	/// Materializes the payload inside `dir` and returns its path.
	pub fn download(&self, dir: &Path, fetcher: &impl Fetcher) -> Result<PathBuf, InstallError> {
		let destination = self.download_path(dir);
		log::debug!("Fetching {} from {}", self.full_name(), self.source);
		fetcher.fetch(&self.source, &destination)?;
		Ok(destination)
	}
}

impl AsRef<Specification> for ResolvedRequest {
	fn as_ref(&self) -> &Specification {
		&self.spec
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn source_is_tagged_in_json() {
		let source: PackageSource = serde_json::from_str(r#"{ "type": "remote", "url": "https://example.com/a.tar.gz", "sha256": "ab" }"#).unwrap();
		assert_eq!(source.sha256(), Some("ab"));
		assert!(matches!(source, PackageSource::Remote { .. }));
	}

	#[test]
	fn payload_lands_in_cache() {
		let spec = Specification::new("a", crate::PackageVersion::new("1.0").unwrap());
		let request = ResolvedRequest::new(spec, PackageSource::local("a.tar.gz"));
		assert_eq!(request.download_path(Path::new("/dir")), Path::new("/dir/cache/a-1.0.tar.gz"));
	}
}
