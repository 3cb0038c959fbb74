//! Cycle tolerant topological sorting.
//!
//! Any graph that can list its nodes and the direct dependencies of a node can be
//! ordered with [`tsort()`]. Dependencies are placed before their dependents.
//!
//! Cycles are not an error. Nodes that depend on each other end up in the same
//! strongly connected component and the edges between them stop constraining the
//! order, every other edge is still honoured.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;

/// The view of a graph needed to order it.
pub trait TopologicalGraph {
	type Node: Copy + Eq + Hash;
	type Error;

	/// Every node in a stable order. This order decides the output order wherever edges don't.
	fn nodes(&self) -> Vec<Self::Node>;

	/// Nodes that `node` depends on.
	fn direct_dependencies_of(&self, node: Self::Node) -> Result<Vec<Self::Node>, Self::Error>;
}

/// Groups nodes into strongly connected components, dependencies first.
///
/// A component only ever follows components it depends on. Members of a component are
/// kept in the order given by [`nodes()`](TopologicalGraph::nodes). Among components whose
/// dependencies are all placed, the one holding the earliest node goes first.
///
/// Nothing here recurses, so long dependency chains are fine.
///
/// # Errors
/// Any error from [`direct_dependencies_of()`](TopologicalGraph::direct_dependencies_of) is returned unchanged.
pub fn strongly_connected_components<G: TopologicalGraph>(graph: &G) -> Result<Vec<Vec<G::Node>>, G::Error> {
	let mut nodes = Vec::<G::Node>::new();
	let mut dag = DiGraph::<usize, ()>::new();
	let mut indices = HashMap::new();

	for node in graph.nodes() {
		if !indices.contains_key(&node) {
			indices.insert(node, dag.add_node(nodes.len()));
			nodes.push(node);
		}
	}

	for node in &nodes {
		let src = indices[node];
		for dependency in graph.direct_dependencies_of(*node)? {
			if let Some(&dst) = indices.get(&dependency) {
				dag.update_edge(src, dst, ());
			} else {
				log::trace!("Ignoring dependency on a node outside the graph.");
			}
		}
	}

	let mut components: Vec<Vec<usize>> = petgraph::algo::kosaraju_scc(&dag)
		.into_iter()
		.map(|component| {
			let mut members: Vec<usize> = component.into_iter().map(|i| dag[i]).collect();
			members.sort_unstable();
			if members.len() > 1 {
				log::debug!("Breaking dependency cycle between {} nodes.", members.len());
			}
			members
		})
		.collect();

	let mut component_of = vec![0; nodes.len()];
	for (c, members) in components.iter().enumerate() {
		for member in members {
			component_of[*member] = c;
		}
	}

	/* Edges between components, counted per edge so each one is released once */
	let mut pending = vec![0usize; components.len()];
	let mut dependents = vec![Vec::<usize>::new(); components.len()];
	for edge in dag.edge_references() {
		let src = component_of[dag[edge.source()]];
		let dst = component_of[dag[edge.target()]];
		if src != dst {
			pending[src] += 1;
			dependents[dst].push(src);
		}
	}

	let mut ready: BinaryHeap<Reverse<(usize, usize)>> = pending.iter()
		.enumerate()
		.filter(|(_, count)| **count == 0)
		.map(|(c, _)| Reverse((components[c][0], c)))
		.collect();

	let mut ordered = Vec::<Vec<G::Node>>::with_capacity(components.len());
	while let Some(Reverse((_, c))) = ready.pop() {
		for dependent in std::mem::take(&mut dependents[c]) {
			pending[dependent] -= 1;
			if pending[dependent] == 0 {
				ready.push(Reverse((components[dependent][0], dependent)));
			}
		}
		ordered.push(std::mem::take(&mut components[c]).into_iter().map(|i| nodes[i]).collect());
	}

	Ok(ordered)
}

/// Flattens [`strongly_connected_components()`] into a single order.
pub fn tsort<G: TopologicalGraph>(graph: &G) -> Result<Vec<G::Node>, G::Error> {
	Ok(strongly_connected_components(graph)?.into_iter().flatten().collect())
}
