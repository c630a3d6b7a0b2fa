//! Watch face activation domain.
//!
//! Decides which user action, if any, is needed to make a freshly pushed
//! watch face the active one.

mod resolver;
mod strategy;

pub use resolver::{resolve, ActivationState};
pub use strategy::ActivationStrategy;
