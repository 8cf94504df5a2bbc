use config::builder::DefaultState;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Apply pending migrations before serving.
    pub migrate: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub span_events: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Defaults, then `trivia.toml` from the working directory, then `TRIVIA__*`
    /// environment variables (`TRIVIA__SERVER__PORT=9000`).
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        defaults()?
            .add_source(File::with_name("trivia").required(false))
            .add_source(
                Environment::with_prefix("TRIVIA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
    ConfigBuilder::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.url", "sqlite:trivia.db")?
        .set_default("database.max_connections", 5)?
        .set_default("database.migrate", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.span_events", false)
}
