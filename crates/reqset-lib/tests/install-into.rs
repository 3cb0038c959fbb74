use reqset::installer::{ArchiveInstaller, DefaultFetcher};
use reqset::*;
use reqset_test_utils::*;

fn init_log() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn installed_specs(dir: &std::path::Path) -> Vec<String> {
	let specs = specification_store::specs_in(dir).expect("failed to read specification store");
	specs.iter().map(Specification::full_name).collect()
}

#[test]
fn single_package_is_installed() {
	init_log();
	let dir = temp_dir();

	let set = resolved_set(vec![request("a", "1.0").build()]);
	let (fetcher, installer) = (StubFetcher::default(), RecordingInstaller::default());
	let installed = set.install_into(dir.path(), false, &fetcher, &installer).unwrap();

	assert_eq!(full_names(&installed), ["a-1.0"]);
	assert_eq!(installer.installed(), ["a-1.0"]);
	assert_eq!(installed_specs(dir.path()), ["a-1.0"]);
	assert_eq!(fetcher.fetched(), [std::path::absolute(dir.path()).unwrap().join("cache").join("a-1.0.tar.gz")]);
}

#[test]
fn dependency_is_installed_first() {
	init_log();
	let dir = temp_dir();

	let set = resolved_set(vec![
		request("a", "1.0").depends("b", ">= 0").build(),
		request("b", "1.0").build(),
	]);
	let installer = RecordingInstaller::default();
	let installed = set.install_into(dir.path(), false, &StubFetcher::default(), &installer).unwrap();

	assert_eq!(full_names(&installed), ["b-1.0", "a-1.0"]);
	assert_eq!(installer.installed(), ["b-1.0", "a-1.0"]);
}

#[test]
fn second_install_does_nothing() {
	init_log();
	let dir = temp_dir();

	let set = resolved_set(vec![
		request("a", "1.0").depends("b", ">= 0").build(),
		request("b", "1.0").build(),
	]);
	set.install_into(dir.path(), false, &StubFetcher::default(), &RecordingInstaller::default()).unwrap();

	let (fetcher, installer) = (StubFetcher::default(), RecordingInstaller::default());
	let installed = set.install_into(dir.path(), false, &fetcher, &installer).unwrap();
	assert!(installed.is_empty());
	assert!(installer.installed().is_empty());
	assert!(fetcher.fetched().is_empty());
}

#[test]
fn force_reinstalls_everything() {
	init_log();
	let dir = temp_dir();

	let set = resolved_set(vec![
		request("a", "1.0").depends("b", ">= 0").build(),
		request("b", "1.0").build(),
	]);
	set.install_into(dir.path(), false, &StubFetcher::default(), &RecordingInstaller::default()).unwrap();

	let installer = RecordingInstaller::default();
	let installed = set.install_into(dir.path(), true, &StubFetcher::default(), &installer).unwrap();
	assert_eq!(full_names(&installed), ["b-1.0", "a-1.0"]);
	assert_eq!(installer.installed(), ["b-1.0", "a-1.0"]);
}

#[test]
fn only_missing_packages_are_installed() {
	init_log();
	let dir = temp_dir();

	let b = request("b", "1.0").build();
	specification_store::save(dir.path(), &b.spec).unwrap();

	let set = resolved_set(vec![request("a", "1.0").depends("b", ">= 0").build(), b]);
	let installed = set.install_into(dir.path(), false, &StubFetcher::default(), &RecordingInstaller::default()).unwrap();
	assert_eq!(full_names(&installed), ["a-1.0"]);
}

#[test]
fn other_version_installed_is_not_enough() {
	init_log();
	let dir = temp_dir();

	specification_store::save(dir.path(), &request("a", "0.9").build().spec).unwrap();

	let set = resolved_set(vec![request("a", "1.0").build()]);
	let installed = set.install_into(dir.path(), false, &StubFetcher::default(), &RecordingInstaller::default()).unwrap();
	assert_eq!(full_names(&installed), ["a-1.0"]);
	assert_eq!(installed_specs(dir.path()), ["a-0.9", "a-1.0"]);
}

#[test]
fn failure_stops_without_rollback() {
	init_log();
	let dir = temp_dir();

	let set = resolved_set(vec![
		request("c", "1.0").depends("b", ">= 0").build(),
		request("b", "1.0").depends("a", ">= 0").build(),
		request("a", "1.0").build(),
	]);
	let installer = RecordingInstaller::failing_on("b");
	let result = set.install_into(dir.path(), false, &StubFetcher::default(), &installer);

	assert!(matches!(result, Err(Error::Installation(_))));
	assert_eq!(installer.installed(), ["a-1.0"]);
	assert_eq!(installed_specs(dir.path()), ["a-1.0"]);
}

#[test]
fn missing_directory_is_created() {
	init_log();
	let dir = temp_dir();
	let target = dir.path().join("nested").join("target");

	let set = resolved_set(vec![request("a", "1.0").build()]);
	set.install_into(&target, false, &StubFetcher::default(), &RecordingInstaller::default()).unwrap();
	assert!(target.is_dir());
	assert_eq!(installed_specs(&target), ["a-1.0"]);
}

#[test]
fn unresolved_set_installs_nothing() {
	init_log();
	let dir = temp_dir();

	let target = dir.path().join("target");

	let set = RequestSet::default();
	let result = set.install_into(&target, false, &StubFetcher::default(), &RecordingInstaller::default());
	assert!(matches!(result, Err(Error::NotResolved)));
	assert!(!target.exists());
}

#[test]
fn inconsistent_set_touches_nothing() {
	init_log();
	let dir = temp_dir();
	let target = dir.path().join("target");

	let set = resolved_set(vec![request("a", "1.0").depends("missing", ">= 0").build()]);
	let installer = RecordingInstaller::default();
	let result = set.install_into(&target, true, &StubFetcher::default(), &installer);
	assert!(matches!(result, Err(Error::UnresolvedDependency(_))));
	assert!(installer.installed().is_empty());
	assert!(!target.exists());
}

#[test]
fn archives_are_unpacked_into_directory() {
	init_log();
	let dir = temp_dir();
	let payloads = dir.path().join("payloads");
	std::fs::create_dir_all(&payloads).unwrap();
	write_payload(&payloads.join("a.tar.gz"), &[("lib/a.rb", "module A; end")]);
	write_payload(&payloads.join("b.tar.gz"), &[("lib/b.rb", "module B; end")]);

	let mut a = request("a", "1.0").depends("b", "~> 2.0").build();
	a.source = PackageSource::local(payloads.join("a.tar.gz"));
	let mut b = request("b", "2.1").build();
	b.source = PackageSource::local(payloads.join("b.tar.gz"));

	let set = resolved_set(vec![a, b]);
	let target = dir.path().join("target");
	let system_dir = dir.path().join("system");
	let fetcher = DefaultFetcher::new(&Config::default()).unwrap();
	let installed = set.install_into(&target, false, &fetcher, &ArchiveInstaller::new(Some(system_dir.clone()))).unwrap();

	assert_eq!(full_names(&installed), ["b-2.1", "a-1.0"]);
	let unpacked = target.join("packages").join("a-1.0").join("lib").join("a.rb");
	assert_eq!(std::fs::read_to_string(unpacked).unwrap(), "module A; end");
	assert_eq!(installed_specs(&target), ["a-1.0", "b-2.1"]);
	assert!(installed_specs(&system_dir).is_empty());
}
