//! Environment Configuration
//!
//! Loads configuration from a `.env` file and the process environment.
//! Every variable has a development default; `JWT_SECRET` must be set
//! in production because its default is insecure.

use std::env;
use std::time::Duration;

use auth::AuthConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_expiry: Duration,
    pub refresh_expiry: Duration,
}

impl Config {
    /// Load from the environment. A missing `.env` file is fine.
    pub fn load() -> Self {
        if dotenvy::dotenv().is_err() {
            tracing::info!("No .env file found, using environment variables");
        }

        Self {
            server: ServerConfig {
                port: get_env("SERVER_PORT", "8080")
                    .parse()
                    .unwrap_or(8080),
            },
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", "mongodb://localhost:27017"),
                database: get_env("MONGODB_DATABASE", "blog_db"),
            },
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET", "your-super-secret-jwt-key-here"),
                access_expiry: get_duration_env("JWT_ACCESS_EXPIRY", Duration::from_secs(15 * 60)),
                refresh_expiry: get_duration_env(
                    "JWT_REFRESH_EXPIRY",
                    Duration::from_secs(168 * 3600),
                ),
            },
        }
    }

    /// The auth-layer view of this configuration
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt.secret.clone(),
            access_ttl: self.jwt.access_expiry,
            refresh_ttl: self.jwt.refresh_expiry,
            session_ttl: self.jwt.refresh_expiry,
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn get_duration_env(key: &str, default: Duration) -> Duration {
    match env::var(key) {
        Ok(value) if !value.is_empty() => parse_duration(&value).unwrap_or(default),
        _ => default,
    }
}

/// Parse durations of the form `30s`, `15m`, `168h`, `7d`, or bare seconds.
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();

    let (number, unit) = match value.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => value.split_at(idx),
        None => (value, "s"),
    };

    let number: u64 = number.parse().ok()?;
    let seconds = match unit {
        "s" => number,
        "m" => number * 60,
        "h" => number * 3600,
        "d" => number * 24 * 3600,
        _ => return None,
    };

    Some(Duration::from_secs(seconds))
}
