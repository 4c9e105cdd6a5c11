use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::dispatch::Next;
use crate::core::error::DispatchError;

/// A single method implementation living in a capability module or class.
///
/// The first argument is the delegation handle for the rest of the chain,
/// the second the call arguments.
pub type MethodImpl =
    Arc<dyn Fn(&Next<'_>, &[String]) -> Result<String, DispatchError> + Send + Sync>;

/// A named bundle of method implementations that can be included in a class
#[derive(Clone)]
pub struct CapabilityModule {
    name: String,
    description: String,
    methods: Vec<(String, MethodImpl)>, // (method name, implementation), definition order
}

impl CapabilityModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            methods: Vec::new(),
        }
    }

    /// Attach a human readable description used by listings
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Define a method on this module.
    ///
    /// Defining the same name twice replaces the earlier body in place, so
    /// the module never holds two implementations of one method.
    pub fn define<F>(mut self, method: impl Into<String>, implementation: F) -> Self
    where
        F: Fn(&Next<'_>, &[String]) -> Result<String, DispatchError> + Send + Sync + 'static,
    {
        let method = method.into();
        let implementation: MethodImpl = Arc::new(implementation);

        if let Some(slot) = self.methods.iter_mut().find(|(name, _)| *name == method) {
            debug!("Redefining {}#{}", self.name, method);
            slot.1 = implementation;
        } else {
            self.methods.push((method, implementation));
        }

        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Looks up the implementation of a method defined directly on this module
    pub fn method(&self, name: &str) -> Option<&MethodImpl> {
        self.methods
            .iter()
            .find(|(method, _)| method == name)
            .map(|(_, implementation)| implementation)
    }

    pub fn defines(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// Method names in definition order
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for CapabilityModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityModule")
            .field("name", &self.name)
            .field("methods", &self.method_names())
            .finish()
    }
}

/// Capability descriptor for auto-registration
#[derive(Debug, Clone)]
pub struct CapabilityDescriptor {
    pub factory: fn() -> CapabilityModule,
}

// Inventory collection for auto-registering capability modules
inventory::collect!(CapabilityDescriptor);

/// Registry of the capability modules available to class definitions
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    modules: Vec<Arc<CapabilityModule>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Auto-discover and register all capability modules from inventory
    ///
    /// Inventory iteration order is unspecified, so modules are sorted by
    /// name to keep listings stable.
    pub fn discover() -> Self {
        let mut registry = Self::new();

        for descriptor in inventory::iter::<CapabilityDescriptor> {
            registry.add_module((descriptor.factory)());
        }

        registry
            .modules
            .sort_by(|left, right| left.name().cmp(right.name()));
        debug!("Discovered {} capability modules", registry.modules.len());

        registry
    }

    /// Adds a module, replacing any module registered under the same name
    pub fn add_module(&mut self, module: CapabilityModule) {
        let module = Arc::new(module);

        if let Some(existing) = self
            .modules
            .iter_mut()
            .find(|existing| existing.name() == module.name())
        {
            warn!(
                "Capability module '{}' registered twice, keeping the latest",
                module.name()
            );
            *existing = module;
        } else {
            self.modules.push(module);
        }
    }

    pub fn modules(&self) -> &[Arc<CapabilityModule>] {
        &self.modules
    }

    /// Finds a module by name
    pub fn find(&self, name: &str) -> Option<&Arc<CapabilityModule>> {
        self.modules.iter().find(|module| module.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|module| module.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: &'static str) -> impl Fn(&Next<'_>, &[String]) -> Result<String, DispatchError> {
        move |_next, _args| Ok(value.to_string())
    }

    #[test]
    fn test_module_defines_methods_in_order() {
        let module = CapabilityModule::new("Polite")
            .describe("Polite phrases")
            .define("greet", constant("hi"))
            .define("thank", constant("thanks"));

        assert_eq!(module.name(), "Polite");
        assert_eq!(module.description(), "Polite phrases");
        assert_eq!(module.method_names(), vec!["greet", "thank"]);
        assert!(module.defines("greet"));
        assert!(!module.defines("wave"));
        assert!(!module.is_empty());
    }

    /// Redefinition replaces the body but keeps the original slot
    #[test]
    fn test_module_redefinition_replaces_in_place() {
        let module = CapabilityModule::new("Polite")
            .define("greet", constant("hi"))
            .define("thank", constant("thanks"))
            .define("greet", constant("hello"));

        assert_eq!(module.method_names(), vec!["greet", "thank"]);
        assert!(module.method("greet").is_some());
    }

    #[test]
    fn test_empty_module() {
        let module = CapabilityModule::new("Marker");

        assert!(module.is_empty());
        assert!(module.method("greet").is_none());
        assert_eq!(format!("{module:?}"), "CapabilityModule { name: \"Marker\", methods: [] }");
    }

    #[test]
    fn test_registry_add_and_find() {
        let mut registry = CapabilityRegistry::new();
        registry.add_module(CapabilityModule::new("Polite").define("greet", constant("hi")));

        assert_eq!(registry.names(), vec!["Polite"]);
        assert!(registry.find("Polite").is_some());
        assert!(registry.find("Rude").is_none());
    }

    #[test]
    fn test_registry_replaces_duplicate_names() {
        let mut registry = CapabilityRegistry::new();
        registry.add_module(CapabilityModule::new("Polite").define("greet", constant("hi")));
        registry.add_module(CapabilityModule::new("Polite").define("thank", constant("thanks")));

        assert_eq!(registry.modules().len(), 1);
        let module = registry.find("Polite").unwrap();
        assert!(module.defines("thank"));
        assert!(!module.defines("greet"));
    }

    /// The greeting modules register themselves through inventory
    #[test]
    fn test_registry_discovers_builtin_modules() {
        let registry = CapabilityRegistry::discover();

        assert!(registry.find("BaseGreetings").is_some());
        assert!(registry.find("SpecialGreetings").is_some());

        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
