use serde::Deserialize;
use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    /// "username:password" for the /metrics endpoint
    pub metrics_auth: String,
    pub otlp_endpoint: Option<String>,
    pub assets_base_url: String,
    #[serde(default)]
    pub i18n_catalog: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8081".to_string(),
            metrics_auth: "admin:changeme".to_string(),
            otlp_endpoint: None,
            assets_base_url: "/static".to_string(),
            i18n_catalog: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Try root .env first, then fallback to local .env
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let defaults = Config::default();

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or(defaults.bind_addr);

        let metrics_auth = settings
            .get_string("metrics.auth")
            .or_else(|_| env::var("METRICS_AUTH"))
            .unwrap_or_else(|_| {
                if env == "prod" {
                    tracing::warn!("METRICS_AUTH not set in production, using default credentials");
                }
                defaults.metrics_auth
            });

        let otlp_endpoint = settings
            .get_string("telemetry.otlp_endpoint")
            .or_else(|_| env::var("OTEL_EXPORTER_OTLP_ENDPOINT"))
            .ok()
            .filter(|endpoint| !endpoint.is_empty());

        let assets_base_url = settings
            .get_string("assets.base_url")
            .or_else(|_| env::var("ASSETS_BASE_URL"))
            .unwrap_or(defaults.assets_base_url);

        // Optional [i18n.catalog] table: source string -> translation
        let i18n_catalog = match settings.get::<HashMap<String, String>>("i18n.catalog") {
            Ok(catalog) => catalog,
            Err(config::ConfigError::NotFound(_)) => HashMap::new(),
            Err(e) => return Err(e),
        };

        Ok(Config {
            bind_addr,
            metrics_auth,
            otlp_endpoint,
            assets_base_url,
            i18n_catalog,
        })
    }
}
