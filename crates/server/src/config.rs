//! Service configuration

use billing::TotalPolicy;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// Absent when `DATABASE_URL` is not set; records then live in memory
    pub database: Option<DatabaseConfig>,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Create the `pdf_records` table on startup if missing
    pub auto_migrate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Pre-printed form whose first page is stamped
    pub template_path: PathBuf,
    /// Optional JSON file overriding layout coordinates
    pub layout_path: Option<PathBuf>,
    pub total_policy: TotalPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: None,
            render: RenderConfig {
                template_path: PathBuf::from("template.pdf"),
                layout_path: None,
                total_policy: TotalPolicy::default(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let server = ServerConfig {
            host: var("HOST").unwrap_or(defaults.server.host),
            port: match var("PORT") {
                Some(v) => parse_value("PORT", &v)?,
                None => defaults.server.port,
            },
        };

        let database = match var("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: match var("DATABASE_MAX_CONNECTIONS") {
                    Some(v) => parse_value("DATABASE_MAX_CONNECTIONS", &v)?,
                    None => 5,
                },
                auto_migrate: match var("AUTO_MIGRATE") {
                    Some(v) => parse_bool("AUTO_MIGRATE", &v)?,
                    None => false,
                },
            }),
            None => None,
        };

        let render = RenderConfig {
            template_path: var("TEMPLATE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.render.template_path),
            layout_path: var("LAYOUT_PATH").map(PathBuf::from),
            total_policy: match var("TOTAL_POLICY") {
                Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "TOTAL_POLICY",
                    value: v.clone(),
                })?,
                None => defaults.render.total_policy,
            },
        };

        Ok(Self {
            server,
            database,
            render,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}
