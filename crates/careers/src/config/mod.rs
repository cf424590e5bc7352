use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_JOB_LISTINGS_URL: &str = "https://script.googleusercontent.com/macros/echo?user_content_key=AehSKLjOvtiacwT3fGKQQtk3Mh3ECDyAgwPY-5Nkb7s8Tl6njjaJvFQSXf4z0gqE2WlQBlCmheRtzOQJjsDbKJNsWcIga717FQ0L0asl_4Pj4IdleA3aLB09F881EVwCm63bN46tRpoSGP4sc40nqTTY-6_j5C_EfY1SiZVISRX9s3abyhFGzq5Upvd1HsJy0_iNNjmdcp0ccaNGe7UziK7th36L9v6AActcjZ_yXJ8uyxnpiFb2oqhKyHhtq-XqC7PW7amhfknKru2l83QDzvdSo_Bxc6u5I6mkHQjTu9-6XW41UeDMZbNnptdUyNyAxg&lib=MOG3XTzfacQmAEOKOhbhck_HvpOmuPJJp";
pub const DEFAULT_RELAY_ENDPOINT: &str = "http://127.0.0.1:3000/api/apply";
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Distinguishes runtime behavior for different stages of the service.
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

/// Top-level configuration for the careers service and CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub mail: MailConfig,
    pub listings: ListingSourceConfig,
    pub relay: RelayConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { var: "APP_PORT" })?;

        let log_level = var_or("APP_LOG_LEVEL", "info");

        let mail = MailConfig {
            host: var_or("SMTP_HOST", "smtp.gmail.com"),
            port: var_or("SMTP_PORT", "465")
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { var: "SMTP_PORT" })?,
            secure: parse_flag("SMTP_SECURE", &var_or("SMTP_SECURE", "true"))?,
            user: optional_var("SMTP_USER"),
            password: optional_var("SMTP_PASSWORD"),
            sender_name: var_or("MAIL_SENDER_NAME", "Empowerment Group Careers"),
            recipient: var_or("MAIL_RECIPIENT", "info@empowerment.group"),
        };

        let listings = ListingSourceConfig {
            url: var_or("JOB_LISTINGS_URL", DEFAULT_JOB_LISTINGS_URL),
        };

        let relay = RelayConfig {
            endpoint: var_or("RELAY_ENDPOINT", DEFAULT_RELAY_ENDPOINT),
            max_body_bytes: match optional_var("RELAY_MAX_BODY_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidBodyLimit { value: raw })?,
                None => DEFAULT_MAX_BODY_BYTES,
            },
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            mail,
            listings,
            relay,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: raw.to_string(),
        }),
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

/// Outbound SMTP relay settings. Sender and recipient are fixed per deployment.
#[derive(Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS (SMTPS) when true, STARTTLS upgrade otherwise.
    pub secure: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    pub sender_name: String,
    pub recipient: String,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("sender_name", &self.sender_name)
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Where the job board snapshot is read from.
#[derive(Debug, Clone)]
pub struct ListingSourceConfig {
    pub url: String,
}

/// Relay endpoint settings shared by the server and the CLI client.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub endpoint: String,
    pub max_body_bytes: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort { var: &'static str },
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { var: &'static str, value: String },
    InvalidBodyLimit { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { var } => write!(f, "{var} must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { var, value } => {
                write!(f, "{var} must be true or false, got '{value}'")
            }
            ConfigError::InvalidBodyLimit { value } => {
                write!(f, "RELAY_MAX_BODY_BYTES must be a byte count, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort { .. }
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidBodyLimit { .. } => None,
        }
    }
}
