use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};

use crate::config::{ClassConfig, Config};
use crate::core::capability::{CapabilityModule, CapabilityRegistry};
use crate::core::dispatch::{self, DispatchChain, Next};
use crate::core::error::DispatchError;

/// Ordered set of capability modules included in a class.
///
/// Insertion order is preserved; later inclusions take precedence when
/// dispatching.
#[derive(Debug, Clone, Default)]
pub struct CapabilitySet {
    modules: Vec<Arc<CapabilityModule>>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Includes a module. Returns false when a module with the same name is
    /// already part of the set, in which case the set is left unchanged.
    pub fn include(&mut self, module: Arc<CapabilityModule>) -> bool {
        if self.contains(module.name()) {
            return false;
        }
        self.modules.push(module);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.iter().any(|module| module.name() == name)
    }

    /// Modules in inclusion order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<CapabilityModule>> {
        self.modules.iter()
    }

    /// Modules in dispatch order: last included first
    pub fn dispatch_order(&self) -> impl Iterator<Item = &Arc<CapabilityModule>> {
        self.modules.iter().rev()
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|module| module.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// A class definition: included capabilities plus its own methods.
///
/// The own methods form the terminal link of every dispatch chain. A class
/// is immutable once built.
#[derive(Debug, Clone)]
pub struct Class {
    name: String,
    capabilities: CapabilitySet,
    own: CapabilityModule,
}

impl Class {
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Methods defined on the class itself
    pub fn own_methods(&self) -> &CapabilityModule {
        &self.own
    }

    /// Full linearization: last included module first, the class itself last
    pub fn ancestors(&self) -> Vec<String> {
        self.capabilities
            .dispatch_order()
            .map(|module| module.name().to_string())
            .chain(std::iter::once(self.name.clone()))
            .collect()
    }

    pub fn responds_to(&self, method: &str) -> bool {
        self.own.defines(method)
            || self
                .capabilities
                .iter()
                .any(|module| module.defines(method))
    }

    /// Builds the dispatch chain for a method name
    pub fn resolve(&self, method: &str) -> Result<DispatchChain, DispatchError> {
        dispatch::resolve(self, method)
    }

    /// Resolves and invokes a method in one step
    pub fn call(&self, method: &str, args: &[String]) -> Result<String, DispatchError> {
        self.resolve(method)?.invoke(args)
    }
}

/// Builder for class definitions
#[derive(Debug)]
pub struct ClassBuilder {
    name: String,
    capabilities: CapabilitySet,
    own: CapabilityModule,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            own: CapabilityModule::new(name.clone()),
            name,
            capabilities: CapabilitySet::new(),
        }
    }

    /// Includes a capability module; re-including a module is a no-op
    pub fn include(mut self, module: impl Into<Arc<CapabilityModule>>) -> Self {
        let module = module.into();
        let name = module.name().to_string();
        if !self.capabilities.include(module) {
            debug!("{} already includes {}, skipping", self.name, name);
        }
        self
    }

    /// Defines a method on the class itself
    pub fn define<F>(mut self, method: impl Into<String>, implementation: F) -> Self
    where
        F: Fn(&Next<'_>, &[String]) -> Result<String, DispatchError> + Send + Sync + 'static,
    {
        self.own = self.own.define(method, implementation);
        self
    }

    pub fn build(self) -> Class {
        debug!(
            "Defined class {} including [{}]",
            self.name,
            self.capabilities.names().join(", ")
        );
        Class {
            name: self.name,
            capabilities: self.capabilities,
            own: self.own,
        }
    }
}

/// Class descriptor for auto-registration of built-in classes
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    pub factory: fn() -> Class,
}

inventory::collect!(ClassDescriptor);

/// Registry of named class definitions
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: Vec<Arc<Class>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
        }
    }

    /// Auto-discover all built-in classes from inventory, sorted by name
    pub fn discover() -> Self {
        let mut registry = Self::new();

        for descriptor in inventory::iter::<ClassDescriptor> {
            registry.register((descriptor.factory)());
        }

        registry
            .classes
            .sort_by(|left, right| left.name().cmp(right.name()));
        debug!("Discovered {} built-in classes", registry.classes.len());

        registry
    }

    /// Registers a class, replacing any class with the same name
    pub fn register(&mut self, class: Class) {
        let class = Arc::new(class);

        if let Some(existing) = self
            .classes
            .iter_mut()
            .find(|existing| existing.name() == class.name())
        {
            warn!("Class '{}' is redefined, replacing it", class.name());
            *existing = class;
        } else {
            self.classes.push(class);
        }
    }

    /// Registers every class defined in the configuration file
    pub fn register_from_config(
        &mut self,
        config: &Config,
        capabilities: &CapabilityRegistry,
    ) -> Result<()> {
        for (name, class_config) in &config.classes {
            let class = Self::build_from_config(name, class_config, capabilities)?;
            info!(
                "Loaded class {} from config ({} modules)",
                name,
                class.capabilities().len()
            );
            self.register(class);
        }
        Ok(())
    }

    /// Builds a class from its configuration section.
    ///
    /// Own methods from config return their configured text and never
    /// delegate.
    pub fn build_from_config(
        name: &str,
        class_config: &ClassConfig,
        capabilities: &CapabilityRegistry,
    ) -> Result<Class> {
        let mut builder = Class::builder(name);

        for module_name in &class_config.include {
            let module = capabilities.find(module_name).ok_or_else(|| {
                anyhow!(
                    "Class '{name}' includes unknown capability module '{module_name}'. Available: {}",
                    capabilities.names().join(", ")
                )
            })?;
            builder = builder.include(Arc::clone(module));
        }

        for (method, body) in &class_config.methods {
            let body = body.clone();
            builder = builder.define(method.as_str(), move |_next, _args| Ok(body.clone()));
        }

        Ok(builder.build())
    }

    pub fn classes(&self) -> &[Arc<Class>] {
        &self.classes
    }

    /// Finds a class by name
    pub fn find(&self, name: &str) -> Option<&Arc<Class>> {
        self.classes.iter().find(|class| class.name() == name)
    }

    /// Finds a class by name or reports the known class names
    pub fn require(&self, name: &str) -> Result<&Arc<Class>> {
        self.find(name).ok_or_else(|| {
            anyhow!(
                "Unknown class '{name}'. Available: {}",
                self.names().join(", ")
            )
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.classes.iter().map(|class| class.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn module(name: &str, methods: &[&str]) -> CapabilityModule {
        methods.iter().fold(CapabilityModule::new(name), |module, method| {
            let owner = name.to_string();
            module.define(*method, move |_next, _args| Ok(owner.clone()))
        })
    }

    fn registry_with(modules: &[CapabilityModule]) -> CapabilityRegistry {
        let mut registry = CapabilityRegistry::new();
        for module in modules {
            registry.add_module(module.clone());
        }
        registry
    }

    #[test]
    fn test_capability_set_preserves_insertion_order() {
        let mut set = CapabilitySet::new();
        assert!(set.include(Arc::new(module("A", &[]))));
        assert!(set.include(Arc::new(module("B", &[]))));

        assert_eq!(set.names(), vec!["A", "B"]);
        let dispatch: Vec<&str> = set.dispatch_order().map(|m| m.name()).collect();
        assert_eq!(dispatch, vec!["B", "A"]);
    }

    #[test]
    fn test_capability_set_ignores_reinclusion() {
        let mut set = CapabilitySet::new();
        assert!(set.include(Arc::new(module("A", &[]))));
        assert!(set.include(Arc::new(module("B", &[]))));
        assert!(!set.include(Arc::new(module("A", &[]))));

        assert_eq!(set.len(), 2);
        assert_eq!(set.names(), vec!["A", "B"]);
    }

    #[test]
    fn test_class_ancestors_end_with_class() {
        let class = Class::builder("Widget")
            .include(module("Sized", &["size"]))
            .include(module("Named", &["name"]))
            .build();

        assert_eq!(class.ancestors(), vec!["Named", "Sized", "Widget"]);
    }

    #[test]
    fn test_class_responds_to() {
        let class = Class::builder("Widget")
            .include(module("Sized", &["size"]))
            .define("draw", |_next, _args| Ok("drawn".to_string()))
            .build();

        assert!(class.responds_to("size"));
        assert!(class.responds_to("draw"));
        assert!(!class.responds_to("fly"));
    }

    #[test]
    fn test_build_from_config() {
        let registry = registry_with(&[module("A", &["greet"]), module("B", &["greet"])]);
        let class_config = ClassConfig {
            include: vec!["B".to_string(), "A".to_string()],
            methods: BTreeMap::from([("greet".to_string(), "own".to_string())]),
        };

        let class = ClassRegistry::build_from_config("Custom", &class_config, &registry).unwrap();

        assert_eq!(class.ancestors(), vec!["A", "B", "Custom"]);
        // the class's own method is the terminal link and does not delegate
        assert_eq!(class.resolve("greet").unwrap().owners(), vec!["A", "B", "Custom"]);
        assert_eq!(class.call("greet", &[]).unwrap(), "A");
    }

    #[test]
    fn test_build_from_config_unknown_module() {
        let registry = registry_with(&[module("A", &["greet"])]);
        let class_config = ClassConfig {
            include: vec!["Missing".to_string()],
            methods: BTreeMap::new(),
        };

        let error = ClassRegistry::build_from_config("Custom", &class_config, &registry)
            .unwrap_err()
            .to_string();

        assert!(error.contains("Class 'Custom' includes unknown capability module 'Missing'"));
        assert!(error.contains("Available: A"));
    }

    #[test]
    fn test_registry_register_replaces_same_name() {
        let mut registry = ClassRegistry::new();
        registry.register(Class::builder("Widget").build());
        registry.register(
            Class::builder("Widget")
                .define("draw", |_next, _args| Ok("drawn".to_string()))
                .build(),
        );

        assert_eq!(registry.classes().len(), 1);
        assert!(registry.require("Widget").unwrap().responds_to("draw"));
    }

    #[test]
    fn test_registry_require_unknown_class() {
        let mut registry = ClassRegistry::new();
        registry.register(Class::builder("Widget").build());

        let error = registry.require("Gadget").unwrap_err().to_string();
        assert_eq!(error, "Unknown class 'Gadget'. Available: Widget");
    }

    #[test]
    fn test_registry_discovers_builtin_classes() {
        let registry = ClassRegistry::discover();

        assert!(registry.find("MyClass").is_some());
    }

    #[test]
    fn test_register_from_config_layers_over_builtins() {
        let mut classes = ClassRegistry::discover();
        let capabilities = CapabilityRegistry::discover();
        let mut config = Config::default();
        config.classes.insert(
            "Reversed".to_string(),
            ClassConfig {
                include: vec!["SpecialGreetings".to_string(), "BaseGreetings".to_string()],
                methods: BTreeMap::new(),
            },
        );

        classes.register_from_config(&config, &capabilities).unwrap();

        assert!(classes.find("MyClass").is_some());
        let reversed = classes.require("Reversed").unwrap();
        assert_eq!(reversed.call("greet", &[]).unwrap(), "hello by base");
    }
}
