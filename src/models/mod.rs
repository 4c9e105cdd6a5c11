//! Models validated through the rule registry in `core::validation`

pub mod user;

pub use user::User;
