use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::config_schema::{ConfigSchema, ValidationHelpers};

pub const DEFAULT_TIME_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]:[second]";

/// Configuration for mixin-chain
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    /// Logging configuration
    #[schemars(description = "Logging options")]
    pub logging: Option<LoggingConfig>,

    /// Classes defined on top of the built-in ones, keyed by class name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schemars(description = "Additional classes composed from registered capability modules")]
    pub classes: BTreeMap<String, ClassConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct LoggingConfig {
    /// Enable verbose logging by default
    #[schemars(description = "Enable debug logging")]
    pub verbose: Option<bool>,

    /// Time format for log timestamps (uses time crate format syntax)
    #[schemars(description = "Timestamp format in time crate syntax")]
    pub time_format: Option<String>,
}

/// A class defined in the configuration file
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ClassConfig {
    /// Capability modules to include, in inclusion order
    #[serde(default)]
    #[schemars(description = "Capability modules to include; later entries take precedence")]
    pub include: Vec<String>,

    /// Methods defined on the class itself, each returning fixed text
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schemars(description = "Class-level methods mapped to the text they return")]
    pub methods: BTreeMap<String, String>,
}

impl ConfigSchema for Config {
    fn schema_name() -> &'static str {
        "Config"
    }

    fn validate(&self) -> Result<()> {
        for (class_name, class_config) in &self.classes {
            ValidationHelpers::validate_identifier("Class", class_name)?;

            for module_name in &class_config.include {
                ValidationHelpers::validate_identifier("Capability module", module_name)
                    .with_context(|| format!("In class '{class_name}'"))?;
            }

            for method_name in class_config.methods.keys() {
                ValidationHelpers::validate_identifier("Method", method_name)
                    .with_context(|| format!("In class '{class_name}'"))?;
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .await
            .context("Failed to read config file")?;

        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let value: toml::Value =
            toml::from_str(content).context("Failed to parse config file as TOML")?;

        Self::from_toml_value(&value)
    }

    /// Try to load configuration from standard locations
    pub async fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from_file(&path).await;
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Get potential configuration file paths in order of preference
    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Current directory
        paths.push(PathBuf::from("mixin-chain.toml"));
        paths.push(PathBuf::from(".mixin-chain.toml"));

        // 2. User config directory
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("mixin-chain").join("config.toml"));
        }

        // 3. User home directory
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(
                home_dir
                    .join(".config")
                    .join("mixin-chain")
                    .join("config.toml"),
            );
        }

        paths
    }

    /// Check if verbose logging is enabled by default
    pub fn is_verbose_default(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    /// Get the time format for log timestamps
    pub fn get_time_format(&self) -> String {
        self.logging
            .as_ref()
            .and_then(|l| l.time_format.clone())
            .unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string())
    }

    /// Save configuration to file
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        fs::write(path.as_ref(), content)
            .await
            .context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
        [logging]
        verbose = true
        time_format = "[hour]:[minute]:[second]"

        [classes.Reversed]
        include = ["SpecialGreetings", "BaseGreetings"]

        [classes.Reversed.methods]
        farewell = "goodbye"
    "#;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert!(!config.is_verbose_default());
        assert_eq!(config.get_time_format(), DEFAULT_TIME_FORMAT);
        assert!(config.classes.is_empty());
    }

    #[test]
    fn test_config_parse() {
        let config = Config::parse(SAMPLE).unwrap();

        assert!(config.is_verbose_default());
        assert_eq!(config.get_time_format(), "[hour]:[minute]:[second]");

        let reversed = &config.classes["Reversed"];
        assert_eq!(reversed.include, vec!["SpecialGreetings", "BaseGreetings"]);
        assert_eq!(reversed.methods["farewell"], "goodbye");
    }

    /// A class section with neither key is still a valid, empty class
    #[test]
    fn test_config_parse_empty_class() {
        let config = Config::parse("[classes.Blank]").unwrap();

        assert!(config.classes["Blank"].include.is_empty());
        assert!(config.classes["Blank"].methods.is_empty());
    }

    #[test]
    fn test_config_rejects_blank_module_name() {
        let error = Config::parse(
            r#"
            [classes.Broken]
            include = [""]
            "#,
        )
        .unwrap_err();

        let chain = format!("{error:#}");
        assert!(chain.contains("Invalid Config configuration"));
        assert!(chain.contains("In class 'Broken'"));
        assert!(chain.contains("Capability module name must not be empty"));
    }

    #[test]
    fn test_config_rejects_invalid_toml() {
        let error = Config::parse("[classes").unwrap_err();

        assert!(error
            .to_string()
            .contains("Failed to parse config file as TOML"));
    }

    #[tokio::test]
    async fn test_config_load_and_save() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");
        let config = Config::parse(SAMPLE)?;

        config.save_to_file(&config_path).await?;
        let loaded = Config::load_from_file(&config_path).await?;

        assert!(loaded.is_verbose_default());
        assert_eq!(
            loaded.classes["Reversed"].include,
            vec!["SpecialGreetings", "BaseGreetings"]
        );
        assert_eq!(loaded.classes["Reversed"].methods["farewell"], "goodbye");

        Ok(())
    }

    #[tokio::test]
    async fn test_config_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = Config::load_from_file(temp_dir.path().join("absent.toml")).await;

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file"));
    }

    #[test]
    fn test_config_paths() {
        let paths = Config::get_config_paths();

        assert!(paths
            .iter()
            .any(|p| p.file_name().unwrap() == "mixin-chain.toml"));
    }

    #[test]
    fn test_config_render_schema() {
        let schema = Config::render_schema().unwrap();

        assert!(schema["properties"]["classes"].is_object());
        assert!(schema["properties"]["logging"].is_object());
    }
}
