//! Watch face transfer pipeline.
//!
//! Wires the phone and watch use cases from `wf-app` onto the stores in
//! `wf-infra` and the adapters in `wf-platform`.

pub mod bootstrap;

pub use bootstrap::{
    init_tracing_subscriber, load_config, load_config_or_default, wire_phone, wire_watch,
    PhoneRuntime, WatchRuntime,
};
