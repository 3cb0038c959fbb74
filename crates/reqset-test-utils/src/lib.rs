//! Various helpers for testing request sets
//!
//! Everything here is meant for tests, failures to set up fixtures panic.

use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

use reqset::installer::{Fetcher, InstallError, InstallOptions, PackageInstaller};
use reqset::resolver::{CandidateSet, ResolveError, Resolver};
use reqset::{Dependency, PackageSource, PackageVersion, RequestSet, Requirement, ResolvedRequest, Specification};

/// Builds a [`ResolvedRequest`] with a local source named after the package.
pub struct RequestBuilder {
	spec: Specification,
}

impl RequestBuilder {
	pub fn new(name: &str, version: &str) -> Self {
		let version = PackageVersion::new(version).expect("fixture version should be valid");
		Self { spec: Specification::new(name, version) }
	}

	fn requirement(requirement: &str) -> Requirement {
		Requirement::parse([requirement]).expect("fixture requirement should be valid")
	}

	/// Adds a runtime dependency.
	pub fn depends(mut self, name: &str, requirement: &str) -> Self {
		self.spec.dependencies.push(Dependency::runtime(name, Self::requirement(requirement)));
		self
	}

	pub fn dev_depends(mut self, name: &str, requirement: &str) -> Self {
		self.spec.dependencies.push(Dependency::development(name, Self::requirement(requirement)));
		self
	}

	pub fn build(self) -> ResolvedRequest {
		let source = PackageSource::local(format!("{}.tar.gz", self.spec.full_name()));
		ResolvedRequest::new(self.spec, source)
	}
}

pub fn request(name: &str, version: &str) -> RequestBuilder {
	RequestBuilder::new(name, version)
}

/// Full names in the order given.
pub fn full_names<R: AsRef<Specification>>(requests: &[R]) -> Vec<String> {
	requests.iter().map(|r| r.as_ref().full_name()).collect()
}

/// Ignores the declarations and hands back the same requests every time.
pub struct FixedResolver(pub Vec<ResolvedRequest>);

impl Resolver for FixedResolver {
	fn resolve(&self, _: &[Dependency], _: Option<&CandidateSet>) -> Result<Vec<ResolvedRequest>, ResolveError> {
		Ok(self.0.clone())
	}
}

/// A request set already resolved to `requests`.
pub fn resolved_set(requests: Vec<ResolvedRequest>) -> RequestSet {
	let mut set = RequestSet::default();
	set.resolve(&FixedResolver(requests), None).expect("fixed resolver can't fail");
	set
}

/// Writes a small fixed payload for every source.
#[derive(Default)]
pub struct StubFetcher {
	fetched: RefCell<Vec<PathBuf>>,
}

impl StubFetcher {
	pub fn fetched(&self) -> Vec<PathBuf> {
		self.fetched.borrow().clone()
	}
}

impl Fetcher for StubFetcher {
	fn fetch(&self, _: &PackageSource, destination: &Path) -> Result<(), InstallError> {
		if let Some(parent) = destination.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(destination, b"payload")?;
		self.fetched.borrow_mut().push(destination.to_path_buf());
		Ok(())
	}
}

/// Records what it installs and registers each specification in the install directory.
///
/// Installing the package named by `fail_on` fails without registering anything.
#[derive(Default)]
pub struct RecordingInstaller {
	installed: RefCell<Vec<String>>,
	fail_on: Option<String>,
}

impl RecordingInstaller {
	pub fn failing_on(name: &str) -> Self {
		Self { fail_on: Some(name.to_string()), ..Default::default() }
	}

	/// Full names installed, in call order.
	pub fn installed(&self) -> Vec<String> {
		self.installed.borrow().clone()
	}
}

impl PackageInstaller for RecordingInstaller {
	fn install(&self, payload: &Path, spec: &Specification, options: &InstallOptions) -> Result<(), InstallError> {
		if self.fail_on.as_deref() == Some(spec.name.as_str()) {
			return Err(InstallError::Other(format!("refusing to install {}", spec.full_name())));
		}
		if !payload.is_file() {
			return Err(InstallError::Other(format!("payload missing for {}", spec.full_name())));
		}
		reqset::specification_store::save(&options.install_dir, spec)?;
		self.installed.borrow_mut().push(spec.full_name());
		Ok(())
	}
}

/// Writes a gzipped tarball containing `files` to `path`.
pub fn write_payload(path: &Path, files: &[(&str, &str)]) {
	let file = std::fs::File::create(path).expect("failed to create payload");
	let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
	let mut builder = tar::Builder::new(encoder);
	for (name, content) in files {
		let mut header = tar::Header::new_gnu();
		header.set_size(content.len() as u64);
		header.set_mode(0o644);
		header.set_cksum();
		builder.append_data(&mut header, name, content.as_bytes()).expect("failed to append payload file");
	}
	builder.into_inner().and_then(|e| e.finish()).expect("failed to finish payload");
}

/// Writes `content` to a manifest file in `dir`.
pub fn write_manifest(dir: &Path, content: &str) -> PathBuf {
	let path = dir.join("Packagefile");
	let mut file = std::fs::File::create(&path).expect("failed to create manifest");
	file.write_all(content.as_bytes()).expect("failed to write manifest");
	path
}

pub fn temp_dir() -> tempfile::TempDir {
	tempfile::tempdir().expect("failed to create temporary directory")
}
