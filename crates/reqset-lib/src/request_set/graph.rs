//! Resolved requests viewed as a dependency graph.

use std::collections::HashMap;

use crate::package::Dependency;
use crate::tsort::TopologicalGraph;

use super::ResolvedRequest;

/// Nodes are positions in the resolved request list. `a -> b` when `b` satisfies one of
/// `a`'s runtime dependencies, development dependencies never produce edges.
#[derive(Debug)]
pub struct RequestGraph<'req> {
	requests: &'req [ResolvedRequest],
	by_name: HashMap<&'req str, Vec<usize>>,
}

impl<'req> RequestGraph<'req> {
	pub fn new(requests: &'req [ResolvedRequest]) -> Self {
		let mut by_name = HashMap::<&str, Vec<usize>>::new();
		for (i, request) in requests.iter().enumerate() {
			by_name.entry(request.spec.name.as_str()).or_default().push(i);
		}
		Self { requests, by_name }
	}

	pub fn requests(&self) -> &'req [ResolvedRequest] {
		self.requests
	}

	/// Finds the request that fulfills `dependency`.
	///
	/// A resolved set should only hold one version per name. If it holds several
	/// matching versions the highest wins, the earliest one on ties.
	pub fn find_match(&self, dependency: &Dependency) -> Option<usize> {
		self.by_name.get(dependency.name.as_str())?
			.iter()
			.copied()
			.filter(|&i| dependency.is_satisfied_by(&self.requests[i].spec))
			.max_by(|&a, &b| {
				self.requests[a].spec.version.cmp(&self.requests[b].spec.version).then(b.cmp(&a))
			})
	}

	/// Positions of the requests `node` depends on.
	///
	/// # Errors
	/// [`UnresolvedDependency`](crate::Error::UnresolvedDependency) when a runtime dependency
	/// has no match, which means the resolver produced an inconsistent set.
	pub fn direct_dependencies_of(&self, node: usize) -> crate::Result<Vec<usize>> {
		let spec = &self.requests[node].spec;
		let mut dependencies = Vec::new();
		for dependency in spec.runtime_dependencies() {
			match self.find_match(dependency) {
				Some(i) => {
					log::trace!("{} -> {}", spec.full_name(), self.requests[i].full_name());
					dependencies.push(i);
				},
				None => return Err(crate::Error::UnresolvedDependency(dependency.to_string())),
			}
		}
		Ok(dependencies)
	}
}

impl TopologicalGraph for RequestGraph<'_> {
	type Node = usize;
	type Error = crate::Error;

	fn nodes(&self) -> Vec<usize> {
		(0..self.requests.len()).collect()
	}

	fn direct_dependencies_of(&self, node: usize) -> crate::Result<Vec<usize>> {
		RequestGraph::direct_dependencies_of(self, node)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::package::*;
	use crate::PackageSource;

	fn request(name: &str, version: &str, deps: Vec<Dependency>) -> ResolvedRequest {
		let mut spec = Specification::new(name, PackageVersion::new(version).unwrap());
		spec.dependencies = deps;
		ResolvedRequest::new(spec, PackageSource::local(format!("{}.tar.gz", name)))
	}

	fn dep(name: &str, req: &str) -> Dependency {
		Dependency::runtime(name, Requirement::parse([req]).unwrap())
	}

	#[test]
	fn edges_follow_runtime_dependencies() {
		let requests = vec![
			request("a", "1.0", vec![dep("b", ">= 2"), Dependency::development("c", Requirement::any())]),
			request("b", "2.0", vec![]),
			request("c", "1.0", vec![]),
		];
		let graph = RequestGraph::new(&requests);
		assert_eq!(graph.direct_dependencies_of(0).unwrap(), vec![1]);
	}

	#[test]
	fn unmatched_runtime_dependency_is_fatal() {
		let requests = vec![request("a", "1.0", vec![dep("b", ">= 3")]), request("b", "2.0", vec![])];
		let graph = RequestGraph::new(&requests);
		match graph.direct_dependencies_of(0) {
			Err(crate::Error::UnresolvedDependency(d)) => assert_eq!(d, "b (>= 3)"),
			other => panic!("expected unresolved dependency, got {:?}", other),
		}
	}

	#[test]
	fn unmatched_development_dependency_is_ignored() {
		let requests = vec![request("a", "1.0", vec![Dependency::development("b", Requirement::any())])];
		let graph = RequestGraph::new(&requests);
		assert!(graph.direct_dependencies_of(0).unwrap().is_empty());
	}

	#[test]
	fn highest_matching_version_wins() {
		let requests = vec![
			request("b", "1.0", vec![]),
			request("b", "1.5", vec![]),
			request("b", "2.0", vec![]),
		];
		let graph = RequestGraph::new(&requests);
		assert_eq!(graph.find_match(&dep("b", "< 2")), Some(1));
	}

	#[test]
	fn earliest_wins_on_equal_versions() {
		let requests = vec![request("b", "1.0", vec![]), request("b", "1.0.0", vec![])];
		let graph = RequestGraph::new(&requests);
		assert_eq!(graph.find_match(&dep("b", ">= 0")), Some(0));
	}
}
