use serde::{Serialize, Deserialize};

use super::*;

/// A single version of a package and what it depends on.
///
/// Stored as JSON in a directory's specification store, see [`crate::specification_store`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
	pub name: String,
	pub version: PackageVersion,
	#[serde(default)]
	pub dependencies: Vec<Dependency>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub summary: Option<String>,
}

impl Specification {
	pub fn new(name: impl Into<String>, version: PackageVersion) -> Self {
		Self {
			name: name.into(),
			version,
			dependencies: Default::default(),
			summary: None,
		}
	}

	/// Adds a dependency, builder style.
	pub fn with_dependency(mut self, dependency: Dependency) -> Self {
		self.dependencies.push(dependency);
		self
	}

	/// The unambiguous `name-version` of this package.
	pub fn full_name(&self) -> String {
		format!("{}-{}", self.name, self.version)
	}

	/// Dependencies that constrain installation, i.e. everything except development dependencies.
	pub fn runtime_dependencies(&self) -> impl Iterator<Item = &Dependency> {
		self.dependencies.iter().filter(|d| !d.is_development())
	}
}

impl std::fmt::Display for Specification {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.full_name())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn full_name_joins_name_and_version() {
		let spec = Specification::new("rake", PackageVersion::new("10.1.0").unwrap());
		assert_eq!(spec.full_name(), "rake-10.1.0");
	}

	#[test]
	fn runtime_dependencies_skip_development() {
		let spec = Specification::new("a", PackageVersion::new("1.0").unwrap())
			.with_dependency(Dependency::runtime("b", Requirement::any()))
			.with_dependency(Dependency::development("c", Requirement::any()));
		let names: Vec<_> = spec.runtime_dependencies().map(|d| d.name.as_str()).collect();
		assert_eq!(names, ["b"]);
	}
}
