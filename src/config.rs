use serde::Deserialize;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::random::BoundedRng;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub startup: StartupConfig,
    pub shutdown: ShutdownConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub keep_alive: bool,
    // Guards the HTTP header read only; handler sleeps stay unbounded.
    pub header_read_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StartupConfig {
    pub boot_wait_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShutdownConfig {
    pub grace_period_secs: u64,
}

/// Process-wide log verbosity. Ordered so that `level <= configured`
/// means "emit".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            other => Err(format!("invalid log level: '{other}'")),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("PUPPET").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.keep_alive", true)?
            .set_default("server.header_read_timeout_secs", 10)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("startup.boot_wait_secs", 0)?
            .set_default("shutdown.grace_period_secs", 60)?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        // A bad verbosity string cannot be served correctly; fail the boot.
        cfg.log_level().map_err(config::ConfigError::Message)?;
        Ok(cfg)
    }

    pub fn log_level(&self) -> Result<LogLevel, String> {
        self.logging.level.parse()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Everything the handlers share: the loaded configuration plus the
/// injected random generator.
pub struct AppState {
    pub config: Config,
    pub rng: BoundedRng,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: BoundedRng::new(),
        }
    }
}

#[cfg(test)]
impl Config {
    pub fn test_default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
                keep_alive: true,
                header_read_timeout_secs: 10,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                access_log: false,
            },
            startup: StartupConfig { boot_wait_secs: 0 },
            shutdown: ShutdownConfig {
                grace_period_secs: 60,
            },
        }
    }
}
