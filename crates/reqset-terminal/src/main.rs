use std::path::Path;

use reqset::installer::{ArchiveInstaller, DefaultFetcher};
use reqset::resolver::{CandidateSet, PinnedResolver};

const USAGE: &str = "Usage:
	reqset order <manifest> <candidates.json>
	reqset install <manifest> <candidates.json> <dir>";

fn main() {
	env_logger::init();

	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",   "Show help");
		opts.optflag( "f", "force",  "Install packages even when already present");
		opts.optopt(  "c", "config", "Read settings from FILE instead of the data directory", "FILE");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage(USAGE));
			return;
		}

		parsed_options
	};

	let config = match parsed_options.opt_str("c") {
		Some(path) => match reqset::Config::load_from_file(&path) {
			Ok(config) => config,
			Err(e) => { log::error!("Failed to read config file {}: {}", path, e); return },
		},
		None => reqset::Config::load_from_disk().unwrap_or_else(|e| {
			log::warn!("Failed to read config file: {}", e);
			log::warn!("Using default config.");
			reqset::Config::default()
		}),
	};

	let result = match parsed_options.free.first().map(String::as_str) {
		Some("order") => order(&parsed_options.free[1..]),
		Some("install") => install(&config, &parsed_options.free[1..], parsed_options.opt_present("f")),
		Some(other) => Err(Error::UnknownCommand(other.to_string())),
		None => Err(Error::MissingArgument("command")),
	};

	if let Err(e) = result {
		log::error!("{}", e);
		if matches!(e, Error::MissingArgument(_) | Error::UnknownCommand(_)) {
			eprintln!("{}", opts.usage(USAGE));
		}
		std::process::exit(1);
	}
}

/// Declares the manifest's packages and resolves them against the candidate file.
fn resolve_manifest(manifest: impl AsRef<Path>, candidates: impl AsRef<Path>) -> Result<reqset::RequestSet, Error> {
	let mut set = reqset::RequestSet::default();
	set.load_manifest(manifest)?;
	log::debug!("Declared {} packages.", set.dependencies().len());

	let candidates = CandidateSet::load_from_file(candidates)?;
	set.resolve(&PinnedResolver::new(candidates), None)?;
	Ok(set)
}

fn order(args: &[String]) -> Result<(), Error> {
	let manifest = args.first().ok_or(Error::MissingArgument("manifest"))?;
	let candidates = args.get(1).ok_or(Error::MissingArgument("candidates"))?;

	let set = resolve_manifest(manifest, candidates)?;
	for request in set.sorted_requests()? {
		println!("{}", request.full_name());
	}
	Ok(())
}

fn install(config: &reqset::Config, args: &[String], force: bool) -> Result<(), Error> {
	let manifest = args.first().ok_or(Error::MissingArgument("manifest"))?;
	let candidates = args.get(1).ok_or(Error::MissingArgument("candidates"))?;
	let dir = args.get(2).ok_or(Error::MissingArgument("install directory"))?;

	let set = resolve_manifest(manifest, candidates)?;

	let fetcher = DefaultFetcher::new(config).map_err(reqset::Error::from)?;
	let installer = ArchiveInstaller::from_config(config);
	let installed = set.install_into(dir, force, &fetcher, &installer)?;

	if installed.is_empty() {
		println!("Nothing to install.");
	} else {
		println!("Installed packages:");
		for request in installed {
			println!("\t{}", request.full_name());
		}
	}
	Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("reqset error: {0}")]
	Reqset(#[from] reqset::Error),
	#[error("missing argument: {0}")]
	MissingArgument(&'static str),
	#[error("unknown command `{0}`")]
	UnknownCommand(String),
}
