//! # Bootstrap / 启动装配
//!
//! - `config` - Load the TOML configuration file
//! - `tracing` - Install the global tracing subscriber
//! - `wiring` - Assemble the phone and watch runtimes from concrete adapters

pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_config_or_default};
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{resolve_data_dir, wire_phone, wire_watch, PhoneRuntime, WatchRuntime, WiringError};
