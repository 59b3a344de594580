//! Configuration management with layered hierarchy

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::sampling::{Aql, InspectionLevel};

/// Name of the per-directory config file
pub const LOCAL_CONFIG_FILE: &str = ".iqs.yaml";

/// Environment variables and the keys they override
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("IQS_PROJECT", "project_name"),
    ("IQS_LOCATION", "location"),
    ("IQS_BATCH_ROOT", "batch_root"),
    ("IQS_AUTHORITY", "authority"),
    ("IQS_CONTRACTOR", "contractor"),
];

/// Valid configuration keys
pub const KEYS: &[(&str, &str)] = &[
    ("project_name", "Project name printed on reports"),
    ("location", "Digitization site printed on reports"),
    ("batch_root", "Folder holding the BATCH* folders"),
    ("default_level", "Inspection level used when --level is omitted"),
    ("default_aql", "AQL used when --aql is omitted"),
    ("authority", "Reviewer signing for the authority"),
    ("contractor", "Reviewer signing for the contractor"),
    ("default_format", "Default output format (yaml, json, tsv)"),
];

/// IQS configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_root: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_level: Option<InspectionLevel>,

    #[serde(
        deserialize_with = "deserialize_aql",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_aql: Option<Aql>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let local = std::env::current_dir()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE))
            .ok();
        Self::load_from(
            Self::global_config_path().as_deref(),
            local.as_deref(),
            |name| std::env::var(name).ok(),
        )
    }

    /// Load from explicit file locations and an environment lookup
    pub fn load_from(
        global: Option<&Path>,
        local: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/iqs/config.yaml)
        if let Some(global) = global.and_then(Self::read_file) {
            config.merge(global);
        }

        // 3. Local config (./.iqs.yaml)
        if let Some(local) = local.and_then(Self::read_file) {
            config.merge(local);
        }

        // 4. Environment variables
        if let Some(project) = env("IQS_PROJECT") {
            config.project_name = Some(project);
        }
        if let Some(location) = env("IQS_LOCATION") {
            config.location = Some(location);
        }
        if let Some(root) = env("IQS_BATCH_ROOT") {
            config.batch_root = Some(PathBuf::from(root));
        }
        if let Some(authority) = env("IQS_AUTHORITY") {
            config.authority = Some(authority);
        }
        if let Some(contractor) = env("IQS_CONTRACTOR") {
            config.contractor = Some(contractor);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config file");
                return None;
            }
        };
        match serde_yml::from_str::<Option<Config>>(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "config file loaded");
                Some(config.unwrap_or_default())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "iqs")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.project_name.is_some() {
            self.project_name = other.project_name;
        }
        if other.location.is_some() {
            self.location = other.location;
        }
        if other.batch_root.is_some() {
            self.batch_root = other.batch_root;
        }
        if other.default_level.is_some() {
            self.default_level = other.default_level;
        }
        if other.default_aql.is_some() {
            self.default_aql = other.default_aql;
        }
        if other.authority.is_some() {
            self.authority = other.authority;
        }
        if other.contractor.is_some() {
            self.contractor = other.contractor;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Value of a single key, formatted for display
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "project_name" => self.project_name.clone(),
            "location" => self.location.clone(),
            "batch_root" => self.batch_root.as_ref().map(|p| p.display().to_string()),
            "default_level" => self.default_level.map(|l| l.to_string()),
            "default_aql" => self.default_aql.map(|a| a.to_string()),
            "authority" => self.authority.clone(),
            "contractor" => self.contractor.clone(),
            "default_format" => self.default_format.clone(),
            _ => None,
        }
    }

    pub fn is_valid_key(key: &str) -> bool {
        KEYS.iter().any(|(k, _)| *k == key)
    }
}

/// Accept `default_aql` quoted or unquoted. Both forms match by value, so
/// `0.1`, `"0.1"` and `"0.10"` all read as the 0.10 column.
fn deserialize_aql<'de, D>(deserializer: D) -> Result<Option<Aql>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(Raw::Text(text)) => match text.parse::<Aql>() {
            Ok(aql) => Ok(Some(aql)),
            Err(e) => text
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(aql_by_value)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(e)),
        },
        Some(Raw::Number(n)) => aql_by_value(n)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown AQL '{}'", n))),
    }
}

fn aql_by_value(value: f64) -> Option<Aql> {
    Aql::ALL
        .iter()
        .find(|aql| aql.as_str().parse::<f64>().ok() == Some(value))
        .copied()
}
