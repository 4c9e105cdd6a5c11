use anyhow::Result;
use tracing::info;

use super::{build_registries, Outcome};
use crate::config::Config;
use crate::core::capability::CapabilityRegistry;
use crate::core::class::{Class, ClassRegistry};
use crate::core::dispatch::DispatchChain;
use crate::symbols::*;

pub fn handle_call(config: &Config, class: &str, method: &str, args: &[String]) -> Result<Outcome> {
    let (_, classes) = build_registries(config)?;
    let class = classes.require(class)?;

    info!("Calling {}#{}", class.name(), method);
    let result = class.call(method, args)?;
    println!("{result}");

    Ok(Outcome::Success)
}

pub fn handle_chain(config: &Config, class: &str, method: &str) -> Result<Outcome> {
    let (_, classes) = build_registries(config)?;
    let chain = classes.require(class)?.resolve(method)?;

    print!("{}", render_chain(&chain));
    Ok(Outcome::Success)
}

pub fn handle_ancestors(config: &Config, class: &str) -> Result<Outcome> {
    let (_, classes) = build_registries(config)?;
    let class = classes.require(class)?;

    println!("{}", render_ancestors(class));
    Ok(Outcome::Success)
}

pub fn handle_list(config: &Config) -> Result<Outcome> {
    let (capabilities, classes) = build_registries(config)?;

    print!("{}", render_listing(&capabilities, &classes));
    Ok(Outcome::Success)
}

/// One line per link, first dispatched at the top
pub fn render_chain(chain: &DispatchChain) -> String {
    let mut output = format!(
        "{SYMBOL_TOOL_LINK} {}#{} ({} links)\n",
        chain.class(),
        chain.method(),
        chain.len()
    );
    for (index, owner) in chain.owners().iter().enumerate() {
        output.push_str(&format!("  {}. {owner}#{}\n", index + 1, chain.method()));
    }
    output
}

pub fn render_ancestors(class: &Class) -> String {
    class
        .ancestors()
        .join(&format!(" {SYMBOL_CONTENT_ARROW_RIGHT} "))
}

pub fn render_listing(capabilities: &CapabilityRegistry, classes: &ClassRegistry) -> String {
    let mut output = format!("{SYMBOL_CONTENT_PACKAGE} Capability modules:\n");
    for module in capabilities.modules() {
        output.push_str(&format!(
            "  {:<20} {:<24} {}\n",
            module.name(),
            format!("[{}]", module.method_names().join(", ")),
            module.description()
        ));
    }

    output.push('\n');
    output.push_str(&format!("{SYMBOL_CONTENT_CLASS} Classes:\n"));
    for class in classes.classes() {
        output.push_str(&format!(
            "  {:<20} includes [{}]\n",
            class.name(),
            class.capabilities().names().join(", ")
        ));
    }
    output
}
