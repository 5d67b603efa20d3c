use crate::config::DEFAULT_OUTPUT_PATH;
use crate::core::{ConfigProvider, QueryParams};
use crate::domain::model::ParamValue;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_required_field,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub http: Option<HttpConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: Option<String>,
    pub endpoint: Option<String>,
    /// Sent in key order.
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        self.source.endpoint.as_deref().unwrap_or_default()
    }

    fn query_params(&self) -> QueryParams {
        self.source
            .parameters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn timeout(&self) -> Option<Duration> {
        self.http
            .as_ref()
            .and_then(|h| h.timeout_seconds)
            .map(Duration::from_secs)
    }

    fn dataset_name(&self) -> &str {
        self.source.name.as_deref().unwrap_or("COPA cases")
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let endpoint = validate_required_field("source.endpoint", &self.source.endpoint)?;
        validate_url("source.endpoint", endpoint)?;

        if let Some(name) = &self.source.name {
            validate_non_empty_string("source.name", name)?;
        }

        validate_path("load.output_path", &self.load.output_path)?;

        if let Some(ParamValue::Integer(limit)) = self.source.parameters.get("$limit") {
            if *limit < 1 {
                return Err(EtlError::InvalidConfigValueError {
                    field: "source.parameters.$limit".to_string(),
                    value: limit.to_string(),
                    reason: "Value must be at least 1".to_string(),
                });
            }
        }

        if let Some(secs) = self.http.as_ref().and_then(|h| h.timeout_seconds) {
            validate_positive_number("http.timeout_seconds", secs, 1)?;
        }

        Ok(())
    }
}
