use crate::core::capability::CapabilityModule;
use crate::core::class::Class;
use crate::{register_capability, register_class};

pub const BASE_GREETINGS: &str = "BaseGreetings";
pub const SPECIAL_GREETINGS: &str = "SpecialGreetings";
pub const MY_CLASS: &str = "MyClass";

/// Plain greeting that never delegates
pub fn base_greetings() -> CapabilityModule {
    CapabilityModule::new(BASE_GREETINGS)
        .describe("Greets without delegating")
        .define("greet", |_next, _args| Ok("hello by base".to_string()))
}

/// Greeting that extends whatever greeting comes next in the chain
pub fn special_greetings() -> CapabilityModule {
    CapabilityModule::new(SPECIAL_GREETINGS)
        .describe("Extends the next greeting in the chain")
        .define("greet", |next, _args| {
            let inherited = next.delegate()?;
            Ok(format!("{inherited} & hello by special"))
        })
}

/// `MyClass` includes `BaseGreetings`, then `SpecialGreetings`
pub fn my_class() -> Class {
    Class::builder(MY_CLASS)
        .include(base_greetings())
        .include(special_greetings())
        .build()
}

register_capability!(base_greetings);
register_capability!(special_greetings);
register_class!(my_class);
