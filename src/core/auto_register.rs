/// Convenience macro for auto-registering capability modules
///
/// Usage:
/// ```rust,ignore
/// register_capability!(base_greetings);
/// ```
#[macro_export]
macro_rules! register_capability {
    ($factory:path) => {
        inventory::submit! {
            $crate::core::capability::CapabilityDescriptor {
                factory: $factory,
            }
        }
    };
}

/// Auto-register a built-in class definition
///
/// Usage:
/// ```rust,ignore
/// register_class!(my_class);
/// ```
#[macro_export]
macro_rules! register_class {
    ($factory:path) => {
        inventory::submit! {
            $crate::core::class::ClassDescriptor {
                factory: $factory,
            }
        }
    };
}
