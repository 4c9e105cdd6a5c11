//! Tests for method resolution and delegation

use crate::core::capability::CapabilityModule;
use crate::core::class::Class;
use crate::core::dispatch::{resolve, DispatchChain, Next};
use crate::core::error::DispatchError;

/// Module whose method returns its own name without delegating
pub fn terminal_module(name: &str, method: &str) -> CapabilityModule {
    let owner = name.to_string();
    CapabilityModule::new(name).define(method, move |_next, _args| Ok(owner.clone()))
}

/// Module whose method delegates and appends its own name to the result
pub fn wrapping_module(name: &str, method: &str) -> CapabilityModule {
    let owner = name.to_string();
    CapabilityModule::new(name).define(method, move |next, _args| {
        let inner = next.delegate()?;
        Ok(format!("{inner} > {owner}"))
    })
}
