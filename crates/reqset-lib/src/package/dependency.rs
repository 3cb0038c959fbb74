use serde::{Serialize, Deserialize};

use super::*;

/// Whether a dependency is needed at runtime or only to develop the package itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
	#[default] Runtime,
	/// Only needed for the package's own tests and builds. Never affects install order.
	Development,
}

/// A package name together with the versions that are acceptable for it.
///
/// Also used for declarations, the packages a caller wants installed before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
	pub name: String,
	#[serde(default)]
	pub requirement: Requirement,
	#[serde(default)]
	pub kind: DependencyKind,
}

impl Dependency {
	pub fn new(name: impl Into<String>, requirement: Requirement, kind: DependencyKind) -> Self {
		Self { name: name.into(), requirement, kind }
	}

	pub fn runtime(name: impl Into<String>, requirement: Requirement) -> Self {
		Self::new(name, requirement, DependencyKind::Runtime)
	}

	pub fn development(name: impl Into<String>, requirement: Requirement) -> Self {
		Self::new(name, requirement, DependencyKind::Development)
	}

	pub fn is_development(&self) -> bool {
		self.kind == DependencyKind::Development
	}

	pub fn matches(&self, name: &str, version: &PackageVersion) -> bool {
		self.name == name && self.requirement.is_satisfied_by(version)
	}

	pub fn is_satisfied_by(&self, spec: &Specification) -> bool {
		self.matches(&spec.name, &spec.version)
	}
}

impl std::fmt::Display for Dependency {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			DependencyKind::Runtime => write!(f, "{} ({})", self.name, self.requirement),
			DependencyKind::Development => write!(f, "{} ({}, development)", self.name, self.requirement),
		}
	}
}
