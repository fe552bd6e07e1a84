// Re-export all items from the submodules
mod os_version;
mod run_config;

// Re-export the release enumeration
pub use os_version::MacosVersion;

// Re-export run configuration
pub use run_config::{validate_directories, DispatchMode, RunConfig};
