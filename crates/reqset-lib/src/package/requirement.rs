use std::sync::OnceLock;

use serde::{Serialize, Deserialize};

use super::PackageVersion;

/// Comparison used by a single [`Constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
	Eq,
	NotEq,
	Gt,
	Lt,
	GtEq,
	LtEq,
	/// `~>`, allows the last given segment to increase.
	Pessimistic,
}

impl Operator {
	pub fn as_str(&self) -> &'static str {
		match self {
			Operator::Eq => "=",
			Operator::NotEq => "!=",
			Operator::Gt => ">",
			Operator::Lt => "<",
			Operator::GtEq => ">=",
			Operator::LtEq => "<=",
			Operator::Pessimistic => "~>",
		}
	}
}

/// A single version constraint such as `>= 1.0` or `~> 2.3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Constraint {
	pub operator: Operator,
	pub version: PackageVersion,
}

fn constraint_pattern() -> &'static regex::Regex {
	static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
	PATTERN.get_or_init(|| {
		regex::Regex::new(r"^\s*(=|!=|>=|<=|~>|>|<)?\s*([0-9A-Za-z.]+)\s*$").expect("constraint pattern should compile.")
	})
}

impl Constraint {
	pub fn new(operator: Operator, version: PackageVersion) -> Self {
		Self { operator, version }
	}

	/// Parses a constraint, a bare version means `=`.
	pub fn parse(s: &str) -> crate::Result<Self> {
		let captures = constraint_pattern()
			.captures(s)
			.ok_or_else(|| crate::Error::Parse(format!("illformed requirement \"{}\"", s)))?;

		let operator = match captures.get(1).map(|m| m.as_str()) {
			None | Some("=") => Operator::Eq,
			Some("!=") => Operator::NotEq,
			Some(">") => Operator::Gt,
			Some("<") => Operator::Lt,
			Some(">=") => Operator::GtEq,
			Some("<=") => Operator::LtEq,
			Some("~>") => Operator::Pessimistic,
			Some(op) => return Err(crate::Error::Parse(format!("unknown operator \"{}\"", op))),
		};

		Ok(Self { operator, version: PackageVersion::new(&captures[2])? })
	}

	pub fn is_satisfied_by(&self, version: &PackageVersion) -> bool {
		match self.operator {
			Operator::Eq => version == &self.version,
			Operator::NotEq => version != &self.version,
			Operator::Gt => version > &self.version,
			Operator::Lt => version < &self.version,
			Operator::GtEq => version >= &self.version,
			Operator::LtEq => version <= &self.version,
			Operator::Pessimistic => version >= &self.version && version.release() < self.version.bump(),
		}
	}
}

impl TryFrom<String> for Constraint {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(&value) }
}

impl std::str::FromStr for Constraint {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl From<Constraint> for String {
	fn from(value: Constraint) -> Self { value.to_string() }
}

impl std::fmt::Display for Constraint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.operator.as_str(), self.version)
	}
}

/// An ordered set of constraints, all of which must hold.
///
/// An empty requirement accepts any version and displays as `>= 0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Requirement {
	constraints: Vec<Constraint>,
}

impl Requirement {
	pub fn any() -> Self {
		Self::default()
	}

	pub fn new(constraints: Vec<Constraint>) -> Self {
		Self { constraints }
	}

	/// Parses every string as a [`Constraint`], keeping their order.
	///
	/// # Errors
	/// [`Parse`](crate::Error::Parse) on the first string that is not a valid constraint.
	pub fn parse<S: AsRef<str>>(constraints: impl IntoIterator<Item = S>) -> crate::Result<Self> {
		let constraints = constraints.into_iter()
			.map(|s| Constraint::parse(s.as_ref()))
			.collect::<crate::Result<Vec<_>>>()?;
		Ok(Self { constraints })
	}

	pub fn constraints(&self) -> &[Constraint] {
		&self.constraints
	}

	pub fn is_any(&self) -> bool {
		self.constraints.is_empty()
	}

	pub fn is_satisfied_by(&self, version: &PackageVersion) -> bool {
		self.constraints.iter().all(|c| c.is_satisfied_by(version))
	}
}

impl std::fmt::Display for Requirement {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.constraints.is_empty() {
			return write!(f, ">= 0")
		}
		let constraints = self.constraints.iter().map(|c| c.to_string()).collect::<Vec<_>>();
		write!(f, "{}", constraints.join(", "))
	}
}
