use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub airtable: AirtableSettings,
    #[serde(default)]
    pub tables: TableSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Airtable connection settings. `base_id` and `token` are secrets; they are
/// usually injected via `AIRTABLE_BASE_ID` / `AIRTABLE_TOKEN`.
#[derive(Debug, Clone, Deserialize)]
pub struct AirtableSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub base_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    /// Optional Airtable view to query instead of the raw table.
    #[serde(default)]
    pub view: Option<String>,
}

impl Default for AirtableSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            base_id: None,
            token: None,
            view: None,
        }
    }
}

fn default_api_url() -> String {
    "https://api.airtable.com/v0".to_string()
}

/// Table names in the Airtable base
#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_alojamientos")]
    pub alojamientos: String,
    #[serde(default = "default_restaurantes")]
    pub restaurantes: String,
    #[serde(default = "default_experiencias")]
    pub experiencias: String,
    #[serde(default = "default_playas")]
    pub playas: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            alojamientos: default_alojamientos(),
            restaurantes: default_restaurantes(),
            experiencias: default_experiencias(),
            playas: default_playas(),
        }
    }
}

fn default_alojamientos() -> String {
    "Alojamientos".to_string()
}

fn default_restaurantes() -> String {
    "Restaurantes".to_string()
}

fn default_experiencias() -> String {
    "Experiencias".to_string()
}

fn default_playas() -> String {
    "Playas caninas".to_string()
}

/// Page fetch tuning
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_timeout_secs: default_page_timeout_secs(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_page_size() -> usize {
    100
}

fn default_page_timeout_secs() -> u64 {
    8
}

fn default_retry_delay_ms() -> u64 {
    450
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with PLANVIAJE__)
    /// 4. The AIRTABLE_BASE_ID / AIRTABLE_TOKEN secrets
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g. PLANVIAJE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PLANVIAJE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_secret_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PLANVIAJE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Overlay the Airtable secrets from their conventional environment names.
fn apply_secret_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let base_id = env::var("AIRTABLE_BASE_ID").ok();
    let token = env::var("AIRTABLE_TOKEN").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(base_id) = base_id {
        builder = builder.set_override("airtable.base_id", base_id)?;
    }
    if let Some(token) = token {
        builder = builder.set_override("airtable.token", token)?;
    }

    builder.build()
}
