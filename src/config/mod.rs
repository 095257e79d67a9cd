use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog_service: CatalogServiceSettings,
    #[serde(default)]
    pub order_service: OrderServiceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

/// Upstream catalog API supplying product and customer records.
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogServiceSettings {
    #[serde(default = "default_catalog_url")]
    pub url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for CatalogServiceSettings {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Upstream orders API that persists submitted orders.
#[derive(Debug, Deserialize, Clone)]
pub struct OrderServiceSettings {
    #[serde(default = "default_orders_url")]
    pub url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for OrderServiceSettings {
    fn default() -> Self {
        Self {
            url: default_orders_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_catalog_url() -> String {
    "http://localhost:9081".to_string()
}

fn default_orders_url() -> String {
    "http://localhost:9082".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
    let configuration_file = base_path.join("config").join("base.yaml");

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_file).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
