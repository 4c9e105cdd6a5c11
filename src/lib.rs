// Library interface for mixin-chain
pub mod capabilities;
pub mod cli;
pub mod config;
pub mod core;
pub mod models;
pub mod symbols;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::core::{
    resolve, CapabilityModule, CapabilityRegistry, Class, ClassRegistry, DispatchChain,
    DispatchError, Next,
};
