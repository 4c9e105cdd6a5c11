use crate::symbols::*;
use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Trait for configuration validation with schema support
pub trait ConfigSchema: DeserializeOwned + JsonSchema {
    /// The name of this configuration schema (for error reporting)
    fn schema_name() -> &'static str;

    /// Validate the configuration and provide detailed error messages
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Parse and validate configuration from TOML value
    fn from_toml_value(value: &toml::Value) -> Result<Self> {
        let config: Self = value.clone().try_into().with_context(|| {
            format!(
                "Failed to parse {} configuration",
                <Self as ConfigSchema>::schema_name()
            )
        })?;

        config.validate().with_context(|| {
            format!(
                "Invalid {} configuration",
                <Self as ConfigSchema>::schema_name()
            )
        })?;

        Ok(config)
    }

    /// JSON schema describing this configuration
    fn render_schema() -> Result<serde_json::Value> {
        let schema = schemars::schema_for!(Self);
        serde_json::to_value(schema).context("Failed to render configuration schema")
    }
}

/// Helper functions for common validation patterns
pub struct ValidationHelpers;

impl ValidationHelpers {
    /// Validate that a name is usable as a class, module or method identifier
    pub fn validate_identifier(kind: &str, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("{kind} name must not be empty"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(anyhow::anyhow!(
                "{kind} name '{name}' must not contain whitespace"
            ));
        }
        Ok(())
    }

    /// Format a configuration error with the root cause and a working example
    pub fn format_validation_error(config_path: &str, example: &str, error: &anyhow::Error) -> String {
        // Extract the most specific error from the chain
        let root_error = error
            .chain()
            .last()
            .map(|e| e.to_string())
            .unwrap_or_else(|| error.to_string());

        format!(
            "{SYMBOL_INDICATOR_WARNING} Configuration validation failed\n\
             Error: {root_error}\n\
             Check: {config_path}\n\
             Example:\n{example}"
        )
    }
}
