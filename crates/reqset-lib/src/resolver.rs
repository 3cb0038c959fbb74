//! Turning declarations into resolved requests.
//!
//! Resolution is behind the [`Resolver`] trait. [`PinnedResolver`] is a lookup
//! resolver for candidate sets where every package is already pinned to a single
//! version, such as a lockfile. It checks requirements but never chooses between versions.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::package::Dependency;
use crate::request_set::ResolvedRequest;

/// Declarations that can't be satisfied.
#[derive(Debug, Error)]
pub enum ResolveError {
	/// Nothing in the candidate set has the dependency's name.
	#[error("unable to find a candidate for {0}")]
	Missing(String),
	/// The candidate with the dependency's name doesn't satisfy its requirement.
	#[error("{candidate} does not satisfy {dependency}")]
	Conflict { dependency: String, candidate: String },
	/// The candidate set offers several versions of one package.
	#[error("more than one version of {0} is pinned")]
	Ambiguous(String),
}

/// Packages available to a resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateSet {
	candidates: Vec<ResolvedRequest>,
}

impl CandidateSet {
	pub fn new(candidates: Vec<ResolvedRequest>) -> Self {
		Self { candidates }
	}

	/// Loads a JSON list of requests.
	pub fn load_from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	pub fn push(&mut self, candidate: ResolvedRequest) {
		self.candidates.push(candidate);
	}

	pub fn iter(&self) -> std::slice::Iter<'_, ResolvedRequest> {
		self.candidates.iter()
	}

	pub fn len(&self) -> usize {
		self.candidates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}
}

impl FromIterator<ResolvedRequest> for CandidateSet {
	fn from_iter<T: IntoIterator<Item = ResolvedRequest>>(iter: T) -> Self {
		Self { candidates: iter.into_iter().collect() }
	}
}

impl<'a> IntoIterator for &'a CandidateSet {
	type Item = &'a ResolvedRequest;
	type IntoIter = std::slice::Iter<'a, ResolvedRequest>;
	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

pub trait Resolver {
	/// Resolves `dependencies` into the flat list of requests needed to install them.
	///
	/// `candidates` replaces whatever packages the resolver would otherwise consider.
	fn resolve(&self, dependencies: &[Dependency], candidates: Option<&CandidateSet>) -> Result<Vec<ResolvedRequest>, ResolveError>;
}

/// Resolves against a candidate set holding at most one version per package.
#[derive(Debug, Clone, Default)]
pub struct PinnedResolver {
	candidates: CandidateSet,
}

impl PinnedResolver {
	pub fn new(candidates: CandidateSet) -> Self {
		Self { candidates }
	}
}

impl Resolver for PinnedResolver {
	/// Walks the declarations then their runtime dependencies breadth first.
	/// Requests are returned in the order they were first reached.
	fn resolve(&self, dependencies: &[Dependency], candidates: Option<&CandidateSet>) -> Result<Vec<ResolvedRequest>, ResolveError> {
		let candidates = candidates.unwrap_or(&self.candidates);

		let mut pinned = HashMap::<&str, &ResolvedRequest>::with_capacity(candidates.len());
		for candidate in candidates {
			if pinned.insert(candidate.spec.name.as_str(), candidate).is_some() {
				return Err(ResolveError::Ambiguous(candidate.spec.name.clone()));
			}
		}

		let mut resolved = Vec::<ResolvedRequest>::new();
		let mut seen = HashSet::<&str>::new();
		let mut queue: VecDeque<&Dependency> = dependencies.iter().collect();

		while let Some(dependency) = queue.pop_front() {
			let candidate = pinned.get(dependency.name.as_str())
				.ok_or_else(|| ResolveError::Missing(dependency.to_string()))?;

			if !dependency.is_satisfied_by(&candidate.spec) {
				return Err(ResolveError::Conflict {
					dependency: dependency.to_string(),
					candidate: candidate.full_name(),
				});
			}

			if seen.insert(candidate.spec.name.as_str()) {
				log::debug!("{} resolved to {}", dependency, candidate.full_name());
				resolved.push((*candidate).clone());
				queue.extend(candidate.spec.runtime_dependencies());
			}
		}

		Ok(resolved)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::package::*;
	use crate::PackageSource;

	fn candidate(name: &str, version: &str, deps: Vec<Dependency>) -> ResolvedRequest {
		let mut spec = Specification::new(name, PackageVersion::new(version).unwrap());
		spec.dependencies = deps;
		ResolvedRequest::new(spec, PackageSource::remote(format!("https://example.com/{}.tar.gz", name)))
	}

	fn dep(name: &str, req: &str) -> Dependency {
		Dependency::runtime(name, Requirement::parse([req]).unwrap())
	}

	fn names(requests: &[ResolvedRequest]) -> Vec<String> {
		requests.iter().map(|r| r.full_name()).collect()
	}

	#[test]
	fn runtime_dependencies_are_followed() {
		let resolver = PinnedResolver::new(CandidateSet::new(vec![
			candidate("a", "1.0", vec![dep("b", ">= 2"), Dependency::development("d", Requirement::any())]),
			candidate("b", "2.0", vec![dep("c", "~> 1.0")]),
			candidate("c", "1.1", vec![]),
			candidate("d", "1.0", vec![]),
			candidate("unused", "1.0", vec![]),
		]));
		let resolved = resolver.resolve(&[dep("a", ">= 1.0")], None).unwrap();
		assert_eq!(names(&resolved), ["a-1.0", "b-2.0", "c-1.1"]);
	}

	#[test]
	fn shared_dependencies_resolve_once() {
		let resolver = PinnedResolver::new(CandidateSet::new(vec![
			candidate("a", "1.0", vec![dep("c", ">= 0")]),
			candidate("b", "1.0", vec![dep("c", ">= 0")]),
			candidate("c", "1.0", vec![dep("a", ">= 0")]),
		]));
		let resolved = resolver.resolve(&[dep("a", ">= 0"), dep("b", ">= 0")], None).unwrap();
		assert_eq!(names(&resolved), ["a-1.0", "b-1.0", "c-1.0"]);
	}

	#[test]
	fn missing_candidate_fails() {
		let resolver = PinnedResolver::default();
		assert!(matches!(resolver.resolve(&[dep("a", ">= 0")], None), Err(ResolveError::Missing(_))));
	}

	#[test]
	fn unsatisfied_requirement_conflicts() {
		let resolver = PinnedResolver::new(CandidateSet::new(vec![candidate("a", "1.0", vec![])]));
		match resolver.resolve(&[dep("a", ">= 2")], None) {
			Err(ResolveError::Conflict { dependency, candidate }) => {
				assert_eq!(dependency, "a (>= 2)");
				assert_eq!(candidate, "a-1.0");
			},
			other => panic!("expected conflict, got {:?}", other),
		}
	}

	#[test]
	fn duplicate_pins_are_ambiguous() {
		let candidates = CandidateSet::new(vec![candidate("a", "1.0", vec![]), candidate("a", "2.0", vec![])]);
		let resolver = PinnedResolver::default();
		assert!(matches!(resolver.resolve(&[dep("a", ">= 0")], Some(&candidates)), Err(ResolveError::Ambiguous(_))));
	}

	#[test]
	fn given_candidates_replace_defaults() {
		let resolver = PinnedResolver::new(CandidateSet::new(vec![candidate("a", "1.0", vec![])]));
		let candidates: CandidateSet = [candidate("a", "2.0", vec![])].into_iter().collect();
		let resolved = resolver.resolve(&[dep("a", ">= 0")], Some(&candidates)).unwrap();
		assert_eq!(names(&resolved), ["a-2.0"]);
	}
}
