//! A set of requested packages, from declaration through to installation.
//!
//! # Usage
//! 1. Create a [`RequestSet`] and [`declare()`](RequestSet::declare()) the wanted packages,
//! or read them from a manifest with [`load_manifest()`](RequestSet::load_manifest()).
//! 1. [`resolve()`](RequestSet::resolve()) the declarations with a [`Resolver`].
//! 1. [`sorted_requests()`](RequestSet::sorted_requests()) to get an installation order.
//! 1. [`install_into()`](RequestSet::install_into()) to install everything missing from a directory.
//!
//! The specification list and installation order are computed on first access and kept.
//! Only [`resolve()`](RequestSet::resolve()) replaces the resolved requests, and it clears both.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::path::Path;

use crate::manifest::DeclarationSink;
use crate::package::*;
use crate::resolver::{CandidateSet, Resolver};

mod graph;
pub use graph::RequestGraph;

mod request;
pub use request::PackageSource;
pub use request::ResolvedRequest;

mod install;

#[derive(Debug, Default)]
pub struct RequestSet {
	dependencies: Vec<Dependency>,
	requests: Option<Vec<ResolvedRequest>>,
	specs: OnceCell<Vec<Specification>>,
	specs_by_name: OnceCell<BTreeMap<String, Vec<Specification>>>,
	sorted: OnceCell<Vec<usize>>,
}

impl RequestSet {
	pub fn new(dependencies: Vec<Dependency>) -> Self {
		Self { dependencies, ..Default::default() }
	}

	/// Declares that a package `name` matching `requirement` is needed.
	pub fn declare(&mut self, name: impl Into<String>, requirement: Requirement) {
		let dependency = Dependency::runtime(name, requirement);
		log::trace!("Declared {}", dependency);
		self.dependencies.push(dependency);
	}

	/// Declarations in the order they were made.
	pub fn dependencies(&self) -> &[Dependency] {
		&self.dependencies
	}

	/// Reads a manifest file, declaring every package it lists.
	///
	/// # Errors
	/// - [`IO`](crate::Error::IO) when reading the file.
	/// - [`Manifest`](crate::Error::Manifest) when the manifest is malformed, nothing is declared in this case.
	pub fn load_manifest(&mut self, path: impl AsRef<Path>) -> crate::Result<()> {
		let source = std::fs::read_to_string(path.as_ref())?;
		let mut declared = Vec::<(String, Requirement)>::new();
		crate::manifest::interpret(&source, &mut declared)?;
		for (name, requirement) in declared {
			self.declare(name, requirement);
		}
		Ok(())
	}

	/// Resolves the declarations into concrete requests.
	///
	/// # Errors
	/// [`Resolution`](crate::Error::Resolution) with the resolver's error unchanged.
	pub fn resolve(&mut self, resolver: &impl Resolver, candidates: Option<&CandidateSet>) -> crate::Result<&[ResolvedRequest]> {
		let requests = resolver.resolve(&self.dependencies, candidates)?;
		log::info!("Resolved {} declarations into {} requests", self.dependencies.len(), requests.len());
		self.specs = OnceCell::new();
		self.specs_by_name = OnceCell::new();
		self.sorted = OnceCell::new();
		let requests = self.requests.insert(requests);
		Ok(requests.as_slice())
	}

	/// # Errors
	/// [`NotResolved`](crate::Error::NotResolved) before [`resolve()`](RequestSet::resolve()) succeeded.
	pub fn requests(&self) -> crate::Result<&[ResolvedRequest]> {
		self.requests.as_deref().ok_or(crate::Error::NotResolved)
	}

	/// Specifications of every resolved request, in resolution order.
	pub fn specs(&self) -> crate::Result<&[Specification]> {
		let requests = self.requests()?;
		Ok(self.specs.get_or_init(|| requests.iter().map(|r| r.spec.clone()).collect()))
	}

	/// Specifications grouped by package name, each group in resolution order.
	pub fn specs_by_name(&self) -> crate::Result<&BTreeMap<String, Vec<Specification>>> {
		let specs = self.specs()?;
		Ok(self.specs_by_name.get_or_init(|| {
			let mut map = BTreeMap::<String, Vec<Specification>>::new();
			for spec in specs {
				map.entry(spec.name.clone()).or_default().push(spec.clone());
			}
			map
		}))
	}

	pub fn graph(&self) -> crate::Result<RequestGraph<'_>> {
		Ok(RequestGraph::new(self.requests()?))
	}

	/// The resolved requests in an order safe to install from left to right.
	///
	/// # Errors
	/// - [`NotResolved`](crate::Error::NotResolved) before [`resolve()`](RequestSet::resolve()) succeeded.
	/// - [`UnresolvedDependency`](crate::Error::UnresolvedDependency) when the resolved set is inconsistent.
	pub fn sorted_requests(&self) -> crate::Result<Vec<&ResolvedRequest>> {
		let requests = self.requests()?;
		let order = match self.sorted.get() {
			Some(order) => order,
			None => {
				let order = crate::tsort::tsort(&self.graph()?)?;
				self.sorted.get_or_init(|| order)
			},
		};
		Ok(order.iter().map(|i| &requests[*i]).collect())
	}
}

impl DeclarationSink for RequestSet {
	fn declare(&mut self, name: String, requirement: Requirement) {
		RequestSet::declare(self, name, requirement)
	}
}
