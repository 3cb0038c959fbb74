use serde::{Serialize, Deserialize};

/// The version of a package.
///
/// # Format
/// Versions are dot separated, e.g. `1.2.10` or `2.0.0.rc1`.
/// - Runs of digits compare numerically, so `1.2.4 < 1.2.10`.
/// - Runs of letters mark a prerelease and sort before any number, so `2.0.rc1 < 2.0`.
/// - Missing trailing segments count as zero, `1.0` and `1.0.0` are the same version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageVersion {
	version: String,
	segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
	Number(u64),
	Text(String),
}

/// Missing segments compare as `0`.
fn compare_segments(lhs: Option<&Segment>, rhs: Option<&Segment>) -> std::cmp::Ordering {
	use std::cmp::Ordering;
	match (lhs, rhs) {
		(None, None) => Ordering::Equal,
		(None, Some(Segment::Number(r))) => 0.cmp(r),
		(Some(Segment::Number(l)), None) => l.cmp(&0),
		(None, Some(Segment::Text(_))) => Ordering::Greater,
		(Some(Segment::Text(_)), None) => Ordering::Less,
		(Some(Segment::Number(l)), Some(Segment::Number(r))) => l.cmp(r),
		(Some(Segment::Text(l)), Some(Segment::Text(r))) => l.cmp(r),
		(Some(Segment::Text(_)), Some(Segment::Number(_))) => Ordering::Less,
		(Some(Segment::Number(_)), Some(Segment::Text(_))) => Ordering::Greater,
	}
}

impl PackageVersion {
	pub fn new(version: &str) -> crate::Result<Self> {
		let version = version.trim();
		let malformed = || crate::Error::Parse(format!("malformed version \"{}\"", version));

		if version.is_empty() {
			return Err(malformed())
		}

		let mut segments = Vec::<Segment>::new();
		for part in version.split('.') {
			if part.is_empty() || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
				return Err(malformed())
			}

			/* `rc1` is treated as `rc.1` */
			let mut rest = part;
			while !rest.is_empty() {
				let numeric = rest.starts_with(|c: char| c.is_ascii_digit());
				let split = rest.find(|c: char| c.is_ascii_digit() != numeric).unwrap_or(rest.len());
				let (head, tail) = rest.split_at(split);
				segments.push(if numeric {
					Segment::Number(head.parse::<u64>().map_err(|_| malformed())?)
				} else {
					Segment::Text(head.to_string())
				});
				rest = tail;
			}
		}

		Ok(PackageVersion { version: version.to_string(), segments })
	}

	fn from_numbers(numbers: &[u64]) -> Self {
		let version = numbers.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
		PackageVersion { version, segments: numbers.iter().copied().map(Segment::Number).collect() }
	}

	pub fn as_str(&self) -> &str {
		&self.version
	}

	pub fn is_prerelease(&self) -> bool {
		self.segments.iter().any(|s| matches!(s, Segment::Text(_)))
	}

	/// The version with any prerelease part removed, `2.0.rc1` becomes `2.0`.
	pub fn release(&self) -> Self {
		Self::from_numbers(&self.release_numbers())
	}

	/// The upper bound used by the pessimistic operator.
	///
	/// Drops the last segment then increments the new last one, `2.3.1` becomes `2.4` and `2.3` becomes `3`.
	pub fn bump(&self) -> Self {
		let mut numbers = self.release_numbers();
		if numbers.len() > 1 {
			numbers.pop();
		}
		match numbers.last_mut() {
			Some(last) => *last += 1,
			None => numbers.push(1),
		}
		Self::from_numbers(&numbers)
	}

	fn release_numbers(&self) -> Vec<u64> {
		self.segments.iter()
			.map_while(|s| if let Segment::Number(n) = s { Some(*n) } else { None })
			.collect()
	}

	/// Segments without trailing zeros, equal versions share the same canonical form.
	fn canonical_segments(&self) -> &[Segment] {
		let mut end = self.segments.len();
		while end > 0 && self.segments[end - 1] == Segment::Number(0) {
			end -= 1;
		}
		&self.segments[..end]
	}
}

impl TryFrom<String> for PackageVersion {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(&value) }
}

impl TryFrom<&str> for PackageVersion {
	type Error = crate::Error;
	fn try_from(value: &str) -> Result<Self, Self::Error> { Self::new(value) }
}

impl std::str::FromStr for PackageVersion {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

impl From<PackageVersion> for String {
	fn from(value: PackageVersion) -> Self { value.version }
}

impl Ord for PackageVersion {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		let len = std::cmp::max(self.segments.len(), other.segments.len());
		for i in 0..len {
			match compare_segments(self.segments.get(i), other.segments.get(i)) {
				std::cmp::Ordering::Equal => {},
				ord => return ord,
			}
		}
		std::cmp::Ordering::Equal
	}
}

impl PartialOrd for PackageVersion {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for PackageVersion {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == std::cmp::Ordering::Equal
	}
}

impl Eq for PackageVersion {}

impl std::hash::Hash for PackageVersion {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.canonical_segments().hash(state);
	}
}

impl std::fmt::Display for PackageVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.version)
	}
}
