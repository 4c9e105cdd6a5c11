//! Core building blocks: capability modules, classes, dispatch and validation

pub mod auto_register;
pub mod capability;
pub mod class;
pub mod config_schema;
pub mod dispatch;
pub mod error;
pub mod validation;

pub use capability::{CapabilityModule, CapabilityRegistry, MethodImpl};
pub use class::{CapabilitySet, Class, ClassBuilder, ClassRegistry};
pub use dispatch::{resolve, DispatchChain, Next};
pub use error::DispatchError;
pub use validation::{evaluate, Errors, Field, Rule, Validatable, Validator};
