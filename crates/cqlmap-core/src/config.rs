use serde::Deserialize;
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid repository config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("configured keyspace must not be empty")]
    EmptyKeyspace,
}

///
/// RepositoryConfig
///
/// Optional repository settings, typically one table of a larger TOML file.
///
/// ```toml
/// keyspace = "app"
/// metrics = true
/// ```
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Keyspace used when the entity declares none; takes precedence over the
    /// session's bound keyspace.
    pub keyspace: Option<String>,
    /// Attach the process-wide counters sink.
    pub metrics: bool,
}

impl RepositoryConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keyspace.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::EmptyKeyspace);
        }

        Ok(())
    }
}

///
/// TESTS
///
