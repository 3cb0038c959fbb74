use reqset::resolver::{CandidateSet, PinnedResolver, ResolveError};
use reqset::*;
use reqset_test_utils::*;

fn init_log() {
	let _ = env_logger::builder().is_test(true).try_init();
}

const MANIFEST: &str = r#"
source "https://packages.example.com"

package "app", "~> 1.0"

platforms :native do
	package "ext", ">= 0.5"
end

group :test do
	package "checker"
end
"#;

fn candidates() -> CandidateSet {
	CandidateSet::new(vec![
		request("app", "1.2").depends("lib", ">= 2").dev_depends("checker", ">= 0").build(),
		request("lib", "2.0").depends("app", ">= 1").build(),
		request("ext", "0.5").depends("lib", ">= 0").build(),
		request("checker", "1.0").build(),
	])
}

#[test]
fn manifest_resolves_and_sorts() {
	init_log();
	let dir = temp_dir();
	let path = write_manifest(dir.path(), MANIFEST);

	let mut set = RequestSet::default();
	set.load_manifest(&path).unwrap();
	let declared: Vec<String> = set.dependencies().iter().map(|d| d.to_string()).collect();
	assert_eq!(declared, ["app (~> 1.0)", "ext (>= 0.5)"]);

	let resolved = set.resolve(&PinnedResolver::new(candidates()), None).unwrap();
	assert_eq!(full_names(resolved), ["app-1.2", "ext-0.5", "lib-2.0"]);

	let sorted = set.sorted_requests().unwrap();
	assert_eq!(full_names(&sorted), ["app-1.2", "lib-2.0", "ext-0.5"]);
}

#[test]
fn candidates_load_from_json() {
	init_log();
	let dir = temp_dir();
	let path = dir.path().join("candidates.json");
	std::fs::write(&path, serde_json::to_string_pretty(&candidates()).unwrap()).unwrap();

	let loaded = CandidateSet::load_from_file(&path).unwrap();
	assert_eq!(loaded, candidates());
}

#[test]
fn conflicting_candidate_fails_resolution() {
	init_log();
	let dir = temp_dir();
	let path = write_manifest(dir.path(), "package \"app\", \">= 2\"");

	let mut set = RequestSet::default();
	set.load_manifest(&path).unwrap();
	let result = set.resolve(&PinnedResolver::new(candidates()), None);
	assert!(matches!(result, Err(Error::Resolution(ResolveError::Conflict { .. }))));
	assert!(matches!(set.requests(), Err(Error::NotResolved)));
}

#[test]
fn malformed_manifest_declares_nothing() {
	init_log();
	let dir = temp_dir();
	let path = write_manifest(dir.path(), "package \"app\"\npackage \"broken\n");

	let mut set = RequestSet::default();
	assert!(matches!(set.load_manifest(&path), Err(Error::Manifest(_))));
	assert!(set.dependencies().is_empty());
}

#[test]
fn missing_manifest_is_io_error() {
	init_log();
	let dir = temp_dir();

	let mut set = RequestSet::default();
	assert!(matches!(set.load_manifest(dir.path().join("nope")), Err(Error::IO(_))));
}
