//! Downloads a packages content.

use std::io::Write;
use std::path::Path;

use super::*;

/// Copies local payloads and downloads remote ones.
///
/// A payload already present at the destination is reused, unless checksums are on and
/// it doesn't match the source's hash. Payloads are written to a temporary file next to
/// the destination and renamed into place, so an interrupted fetch leaves nothing behind.
pub struct DefaultFetcher {
	client: reqwest::blocking::Client,
	do_checksums: bool,
}

impl DefaultFetcher {
	/// Builds a fetcher honouring the `https_only` and `do_checksums` settings of `config`.
	pub fn new(config: &crate::Config) -> Result<Self, InstallError> {
		let client = reqwest::blocking::Client::builder()
			.https_only(config.https_only())
			.build()?;
		Ok(Self { client, do_checksums: config.do_checksums() })
	}

	fn read_source(&self, source: &PackageSource) -> Result<Vec<u8>, InstallError> {
		match source {
			PackageSource::Local { path, .. } => Ok(std::fs::read(path)?),
			PackageSource::Remote { url, .. } => {
				log::info!("Downloading package from {}", url);
				let content = self.client
					.get(url)
					.send()?
					.error_for_status()?
					.bytes()?
					.to_vec();
				Ok(content)
			},
		}
	}

	/// `false` when checksums are on and `content` doesn't hash to the source's digest.
	fn matches_checksum(&self, source: &PackageSource, content: &[u8]) -> bool {
		match (self.do_checksums, source.sha256()) {
			(true, Some(expected)) => sha256::digest(content).eq_ignore_ascii_case(expected),
			_ => true,
		}
	}
}

impl Fetcher for DefaultFetcher {
	fn fetch(&self, source: &PackageSource, destination: &Path) -> Result<(), InstallError> {
		if destination.exists() {
			let cached = std::fs::read(destination)?;
			if self.matches_checksum(source, &cached) {
				log::info!("Payload {} already present, skipping.", destination.display());
				return Ok(());
			}
			log::warn!("Cached payload {} does not match its hash, fetching again.", destination.display());
			std::fs::remove_file(destination)?;
		}

		let content = self.read_source(source)?;
		if !self.matches_checksum(source, &content) {
			return Err(InstallError::DifferentHashes(source.to_string()));
		}

		let parent = match destination.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};
		std::fs::create_dir_all(parent)?;

		log::debug!("Writing payload to disk: {}", destination.display());
		let mut file = tempfile::NamedTempFile::new_in(parent)?;
		file.write_all(&content)?;
		file.as_file().sync_all()?;
		file.persist(destination).map_err(|e| e.error)?;

		Ok(())
	}
}
