// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LogLevel};

/// Default config file name (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Precedence, highest first: `PORT`, `MOVIES_*` variables, the file, defaults.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_port(config_path, std::env::var("PORT").ok())
    }

    /// An empty or blank `port` leaves the lower layers in charge
    fn load_with_port(
        config_path: &str,
        port: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let port_override = port.filter(|p| !p.trim().is_empty());
        Self::builder(config_path)?
            .set_override_option("server.port", port_override)?
            .build()?
            .try_deserialize()
    }

    fn builder(
        config_path: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("MOVIES")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.request_timeout", 30)?
            .set_default("performance.shutdown_grace_period", 5)?
            .set_default("http.server_name", "movie_server")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("database.seed", true)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Built-in defaults, ignoring config files and `PORT`
    #[cfg(test)]
    pub fn defaults() -> Self {
        Self::builder("__movie_server_test_missing__")
            .and_then(|builder| builder.build())
            .and_then(|settings| settings.try_deserialize())
            .unwrap()
    }
}
