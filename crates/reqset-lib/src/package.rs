//! Various types associated with packages.
//!
//! A [`Specification`] describes a single version of a package and the
//! [`Dependency`]s it declares. Dependencies select versions through a
//! [`Requirement`], an ordered list of [`Constraint`]s that must all hold.

mod version;
pub use version::PackageVersion;

mod requirement;
pub use requirement::Constraint;
pub use requirement::Operator;
pub use requirement::Requirement;

mod dependency;
pub use dependency::Dependency;
pub use dependency::DependencyKind;

mod specification;
pub use specification::Specification;
