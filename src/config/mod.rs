// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig, ServerConfig,
    SiteConfig,
};

impl Config {
    /// Load configuration from `config.toml` (optional) plus the environment.
    ///
    /// The `PORT` variable, when set and non-empty, wins over whatever the
    /// file or the `SITE_*` environment configured.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut cfg = Self::load_from("config")?;
        cfg.server.port = apply_port_override(cfg.server.port, std::env::var("PORT").ok());
        Ok(cfg)
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SITE"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("site.templates_dir", "site/templates")?
            .set_default("site.articles_dir", "site/articles")?
            .set_default("site.not_found_page", "site/templates/not-found.html")?
            .set_default("site.static_dir", "public")?
            .set_default("site.static_route", "/static")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "Minisite/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Apply the `PORT` environment override to a configured port.
///
/// An unset or empty variable leaves the configured value; a value that does
/// not parse as a port is ignored with a warning.
fn apply_port_override(configured: u16, var: Option<String>) -> u16 {
    match var.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => match value.parse() {
            Ok(port) => port,
            Err(_) => {
                crate::logger::log_warning(&format!(
                    "Ignoring invalid PORT value '{value}', keeping port {configured}"
                ));
                configured
            }
        },
        _ => configured,
    }
}
