//! Command-line handlers for the `mixin-chain` binary

pub mod dispatch;
pub mod validate;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;
use crate::core::capability::CapabilityRegistry;
use crate::core::class::ClassRegistry;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Call a method on a class and print the result
    Call {
        /// Class to instantiate
        class: String,

        /// Method to call
        method: String,

        /// Arguments passed to the method
        args: Vec<String>,
    },
    /// Show which implementations a method call walks through
    Chain {
        /// Class to inspect
        class: String,

        /// Method to resolve
        method: String,
    },
    /// Show the linearized ancestors of a class
    Ancestors {
        /// Class to inspect
        class: String,
    },
    /// List capability modules and classes
    List,
    /// Validate a user's password
    Validate {
        /// Password to validate
        #[arg(long)]
        password: Option<String>,

        /// Print errors as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Outcome of a command, mapped to the process exit status by the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Invalid,
}

/// Builds the capability and class registries, layering config classes on
/// top of the built-in ones
pub fn build_registries(config: &Config) -> Result<(CapabilityRegistry, ClassRegistry)> {
    let capabilities = CapabilityRegistry::discover();
    let mut classes = ClassRegistry::discover();
    classes.register_from_config(config, &capabilities)?;
    Ok((capabilities, classes))
}

/// Handle a subcommand
pub fn handle_command(command: Commands, config: &Config) -> Result<Outcome> {
    match command {
        Commands::Call {
            class,
            method,
            args,
        } => dispatch::handle_call(config, &class, &method, &args),
        Commands::Chain { class, method } => dispatch::handle_chain(config, &class, &method),
        Commands::Ancestors { class } => dispatch::handle_ancestors(config, &class),
        Commands::List => dispatch::handle_list(config),
        Commands::Validate { password, json } => validate::handle_validate(password, json),
    }
}
