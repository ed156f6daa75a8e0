// Configuration types module
// Every section falls back to its `Default` when absent from file and environment

use serde::{Deserialize, Serialize};

use crate::maths::Limits;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub maths: MathsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads (CPU cores when unset)
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level for server messages: error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    pub access_log_format: String,
    /// Access log file path (stdout if not set)
    pub access_log_file: Option<String>,
    /// Error log file path (stderr if not set)
    pub error_log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Upper bound on a connection's lifetime, in seconds
    pub request_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive: true,
            request_timeout: 30,
            max_connections: None,
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: "maths-server".to_string(),
            enable_cors: false,
        }
    }
}

/// Maths endpoint and static content configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct MathsConfig {
    /// Path the operation dispatcher answers on
    pub route: String,
    /// Root directory for static content
    pub static_dir: String,
    /// Page served when a maths request carries no `op`
    pub fallback_path: String,
    pub index_files: Vec<String>,
    /// Upper bound for `np`; unbounded when unset
    pub max_nth_prime: Option<u64>,
}

impl Default for MathsConfig {
    fn default() -> Self {
        Self {
            route: "/api/maths".to_string(),
            static_dir: "static".to_string(),
            fallback_path: "/Maths/example.html".to_string(),
            index_files: vec!["index.html".to_string()],
            max_nth_prime: None,
        }
    }
}

impl MathsConfig {
    pub const fn limits(&self) -> Limits {
        Limits {
            max_nth_prime: self.max_nth_prime,
        }
    }
}
