//! Output pipeline configuration.
//!
//! ```yaml
//! serializer: bill
//! logger: "null"
//! gzip: false
//! bill:
//!   no_root_node: true
//!   root_name: "$"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::output::BUILTIN_SERIALIZERS;
use crate::path::{is_valid_node_name, ROOT};
use crate::{Error, Result};

/// Settings of the BILL serializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillConfig {
    /// Leave out root node names and spans
    pub no_root_node: bool,
    /// Name readers give to roots of a stream without root nodes
    pub root_name: String,
}

impl Default for BillConfig {
    fn default() -> Self {
        Self {
            no_root_node: false,
            root_name: ROOT.to_string(),
        }
    }
}

/// Configuration of a serialization pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Registered name of the serializer to use
    pub serializer: String,
    /// Registered name of the logger trees are handed to
    pub logger: String,
    /// Gzip the serialized output
    pub gzip: bool,
    /// BILL serializer settings
    pub bill: BillConfig,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            serializer: "bill".to_string(),
            logger: "null".to_string(),
            gzip: false,
            bill: BillConfig::default(),
        }
    }
}

impl OutputConfig {
    /// Parse and validate a YAML configuration.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file; `.json` files are read as JSON, anything
    /// else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !BUILTIN_SERIALIZERS.contains(&self.serializer.as_str()) {
            return Err(Error::Config(format!(
                "unknown serializer {:?}, expected one of {:?}",
                self.serializer, BUILTIN_SERIALIZERS
            )));
        }
        if self.logger.trim().is_empty() {
            return Err(Error::Config("logger name is empty".to_string()));
        }
        if !is_valid_node_name(&self.bill.root_name) {
            return Err(Error::Config(format!(
                "invalid root_name: {:?}",
                self.bill.root_name
            )));
        }
        Ok(())
    }
}
