pub mod fs;
pub mod one_shot;
pub mod security;
pub mod status_store;

pub use one_shot::FileOneShotFlagStore;
pub use security::Sha256PackageValidator;
pub use status_store::{
    FileInstallationStatusStore, InMemoryInstallationStatusStore, StatusStoreError,
};
