//! Built-in capability modules and the classes composed from them
//!
//! Every module here registers itself with `register_capability!`, so config
//! files can include it by name.

pub mod greetings;

pub use greetings::{base_greetings, my_class, special_greetings};
