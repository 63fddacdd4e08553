//! Pipeline configuration.
//!
//! Settings are environment-style `KEY=value` pairs. [`PipelineConfig::load`]
//! layers the process environment over an optional flat TOML file; tests and
//! embedders build one directly with [`PipelineConfig::from_pairs`] or by
//! overriding fields of [`PipelineConfig::default`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Result type for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Settings for the enrichment stage.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Lookup URL with an `{id}` placeholder. `None` disables enrichment.
    pub url_template: Option<String>,
    /// Substring an object must contain for its subject to be enriched.
    pub trigger: String,
    /// Predicate carrying identifier literals, as `<NS>.<TERM>`.
    pub id_predicate: String,
    /// Pattern an identifier literal must match; the `id` group (or the
    /// first group) is the lookup key.
    pub id_pattern: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            url_template: None,
            trigger: "rijksmonument".into(),
            id_predicate: "DCTERMS.identifier".into(),
            id_pattern: r"^[A-Za-z]{2}[-_ ]?(?P<id>\d+)$".into(),
        }
    }
}

/// Everything a pipeline run needs to know, passed explicitly to each stage.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Artifact path read and written by the stages.
    pub target_path: PathBuf,
    /// Root of the Omeka S installation, with trailing slash.
    pub base_uri: String,
    /// Artifact serialization format (extension or media type).
    pub output_format: String,
    /// Graph identifier.
    pub graph_id: String,
    /// Artifact text encoding label.
    pub encoding: String,
    pub per_page: u32,
    pub max_pages: u32,
    pub http_timeout: Duration,
    /// Substring marking a term as an embedded-document parse artifact.
    pub context_marker: String,
    /// Substring identifying the disallowed custom vocabulary.
    pub custom_vocab_marker: String,
    pub enrichment: EnrichmentConfig,
    /// Register the built-in Dublin Core → schema.org mapping before `MAP_*` rules.
    pub default_mapping: bool,
    /// Extra open namespaces from `NAMESPACE_<NAME>` keys.
    pub namespaces: Vec<(String, String)>,
    /// Raw `MAP_*`, `FILTER*` and `ENRICH_*` pairs for the rule loader.
    pub rule_pairs: Vec<(String, String)>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_path: PathBuf::from("data/api-export.ttl"),
            base_uri: "https://muurschilderingendatabase.nl/".into(),
            output_format: "ttl".into(),
            graph_id: "muurschildering".into(),
            encoding: "utf-8".into(),
            per_page: 100,
            max_pages: 74,
            http_timeout: Duration::from_secs(200),
            context_marker: "@context".into(),
            custom_vocab_marker: "customvocab".into(),
            enrichment: EnrichmentConfig::default(),
            default_mapping: true,
            namespaces: Vec::new(),
            rule_pairs: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Build a configuration from key/value pairs, ignoring unrecognized keys.
    ///
    /// Later pairs override earlier ones for scalar settings.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> ConfigResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            config.apply(key.as_ref(), value.as_ref())?;
        }
        Ok(config)
    }

    /// Load from an optional TOML file, then the process environment.
    pub fn load(file: Option<&Path>) -> ConfigResult<Self> {
        let mut pairs = match file {
            Some(path) => read_toml_pairs(path)?,
            None => Vec::new(),
        };
        pairs.extend(env_pairs(std::env::vars_os()));
        Self::from_pairs(pairs)
    }

    fn apply(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        match key {
            "TARGET_FILEPATH" => self.target_path = PathBuf::from(value),
            "BASE_URI" => {
                self.base_uri = if value.ends_with('/') {
                    value.to_string()
                } else {
                    format!("{value}/")
                }
            }
            "OUTPUT_FILE_FORMAT" => self.output_format = value.to_string(),
            "GRAPH_ID" => self.graph_id = value.to_string(),
            "ENCODING" => self.encoding = value.to_string(),
            "PER_PAGE" => self.per_page = parse_number(key, value)?,
            "MAX_PAGES" => self.max_pages = parse_number(key, value)?,
            "HTTP_TIMEOUT_SECS" => {
                let secs: u64 = parse_number(key, value)?;
                if secs == 0 {
                    return Err(invalid(key, value, "timeout must be at least one second"));
                }
                self.http_timeout = Duration::from_secs(secs);
            }
            "CONTEXT_MARKER" => self.context_marker = non_empty(key, value)?,
            "CUSTOM_VOCAB_MARKER" => self.custom_vocab_marker = non_empty(key, value)?,
            "ENRICHMENT_URL" => {
                self.enrichment.url_template = if value.trim().is_empty() {
                    None
                } else if value.contains("{id}") {
                    Some(value.to_string())
                } else {
                    return Err(invalid(key, value, "URL must contain an {id} placeholder"));
                }
            }
            "ENRICHMENT_TRIGGER" => self.enrichment.trigger = non_empty(key, value)?,
            "ENRICHMENT_ID_PREDICATE" => self.enrichment.id_predicate = value.to_string(),
            "ENRICHMENT_ID_PATTERN" => self.enrichment.id_pattern = value.to_string(),
            "DEFAULT_MAPPING" => self.default_mapping = parse_bool(key, value)?,
            _ => {
                if let Some(name) = key.strip_prefix("NAMESPACE_") {
                    self.namespaces.push((name.to_string(), value.to_string()));
                } else if key.starts_with("MAP_")
                    || key.starts_with("FILTER")
                    || key.starts_with("ENRICH_")
                {
                    self.rule_pairs.push((key.to_string(), value.to_string()));
                }
            }
        }
        Ok(())
    }

    /// URL of page `page` of the items API.
    pub fn page_url(&self, page: u32) -> String {
        format!(
            "{}api/items?format=turtle&page={page}&per_page={}",
            self.base_uri, self.per_page
        )
    }

    /// URL of the JSON-LD context document.
    pub fn context_url(&self) -> String {
        format!("{}api-context", self.base_uri)
    }
}

fn invalid(key: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, value, &e.to_string()))
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn non_empty(key: &str, value: &str) -> ConfigResult<String> {
    if value.is_empty() {
        return Err(invalid(key, value, "must not be empty"));
    }
    Ok(value.to_string())
}

/// Read a flat TOML table into key/value pairs. Scalars are stringified.
fn read_toml_pairs(path: &Path) -> ConfigResult<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table: toml::Table = content.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut pairs = Vec::with_capacity(table.len());
    for (key, value) in table {
        let value = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            other => {
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    message: format!("key {key} must be a scalar, found {}", other.type_str()),
                });
            }
        };
        pairs.push((key, value));
    }
    Ok(pairs)
}

/// Environment entries as strings. Entries that are not valid UTF-8 are skipped.
fn env_pairs(vars: impl IntoIterator<Item = (OsString, OsString)>) -> Vec<(String, String)> {
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                tracing::debug!(key = ?key, "skipping non-UTF-8 environment entry");
                None
            }
        })
        .collect()
}
