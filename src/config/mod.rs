use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the roster service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration, read once at startup from `ROSTER_*` variables
/// (a `.env` file is honored when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    /// Optional CSV to preload time slots from when serving.
    pub seed_csv: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("ROSTER_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("ROSTER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("ROSTER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("ROSTER_LOG").unwrap_or_else(|_| "info".to_string());
        let seed_csv = env::var("ROSTER_SEED_CSV").ok().map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            seed_csv,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl TelemetryConfig {
    /// Subscriber directives: the configured level for this service, with
    /// the HTTP stack's per-request chatter capped at `warn`.
    pub fn filter_directives(&self) -> String {
        format!("{},hyper=warn,tower=warn", self.log_level)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "ROSTER_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "ROSTER_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("ROSTER_ENV");
        env::remove_var("ROSTER_HOST");
        env::remove_var("ROSTER_PORT");
        env::remove_var("ROSTER_LOG");
        env::remove_var("ROSTER_SEED_CSV");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.seed_csv.is_none());
    }

    #[test]
    fn load_reads_the_seed_csv_path() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ROSTER_SEED_CSV", "slots.csv");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.seed_csv, Some(PathBuf::from("slots.csv")));
        reset_env();
    }

    #[test]
    fn filter_directives_cap_the_http_stack() {
        let telemetry = TelemetryConfig {
            log_level: "debug".to_string(),
        };
        assert_eq!(telemetry.filter_directives(), "debug,hyper=warn,tower=warn");
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 8080,
        };
        let addr = server.socket_addr().expect("localhost resolves");
        assert_eq!(addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn rejects_unparseable_host() {
        let server = ServerConfig {
            host: "not-an-ip".to_string(),
            port: 8080,
        };
        assert!(matches!(
            server.socket_addr(),
            Err(ConfigError::InvalidHost { .. })
        ));
    }

    #[test]
    fn environment_parses_aliases() {
        assert_eq!(AppEnvironment::from_str("PROD"), AppEnvironment::Production);
        assert_eq!(AppEnvironment::from_str("ci"), AppEnvironment::Test);
        assert_eq!(
            AppEnvironment::from_str("anything-else"),
            AppEnvironment::Development
        );
    }
}
