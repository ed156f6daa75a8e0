// Configuration module entry point
// Layered loading (defaults, config file, environment) and shared state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, MathsConfig, PerformanceConfig, ServerConfig};

impl Config {
    /// Load configuration from the given file path (without extension)
    ///
    /// The file is optional; every field has a default. `MATHS_`-prefixed
    /// environment variables override both, e.g. `MATHS_SERVER__PORT=9000`.
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(config_path).required(false))
            .add_source(
                ::config::Environment::with_prefix("MATHS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the runtime cannot start with
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.server.workers == Some(0) {
            return Err(ServerError::InvalidConfig(
                "server.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| ServerError::InvalidAddress(addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely/not/here").unwrap();
        assert_eq!(cfg.maths.route, "/api/maths");
        assert_eq!(cfg.maths.fallback_path, "/Maths/example.html");
        assert_eq!(cfg.maths.max_nth_prime, None);
        assert_eq!(cfg.logging.access_log_format, "combined");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9123\n\n[maths]\nmax_nth_prime = 5000\nstatic_dir = \"public\""
        )
        .unwrap();

        let cfg = Config::load_from(dir.path().join("config").to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9123);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.maths.max_nth_prime, Some(5000));
        assert_eq!(cfg.maths.static_dir, "public");
        assert_eq!(cfg.maths.route, "/api/maths");
    }

    #[test]
    fn test_zero_workers_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[server]\nworkers = 0\n").unwrap();

        let result = Config::load_from(dir.path().join("config").to_str().unwrap());
        assert!(matches!(result, Err(ServerError::InvalidConfig(_))));

        let mut cfg = Config::default();
        cfg.server.workers = Some(2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::default();
        cfg.server.port = 8181;
        assert_eq!(cfg.socket_addr().unwrap().port(), 8181);

        cfg.server.host = "not a host".to_string();
        assert!(matches!(cfg.socket_addr(), Err(ServerError::InvalidAddress(_))));
    }
}
