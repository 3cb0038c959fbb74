pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::Config;

pub mod package;
pub use package::Dependency;
pub use package::DependencyKind;
pub use package::PackageVersion;
pub use package::Requirement;
pub use package::Specification;

pub mod tsort;
pub mod manifest;
pub mod resolver;
pub mod installer;
pub mod specification_store;

pub mod request_set;
pub use request_set::RequestSet;
pub use request_set::ResolvedRequest;
pub use request_set::PackageSource;
