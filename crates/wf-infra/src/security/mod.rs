pub mod package_validator;

pub use package_validator::Sha256PackageValidator;
