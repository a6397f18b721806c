use chrono::Duration;
use std::env;
use std::fmt;
use std::path::PathBuf;

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Settings the authentication core needs. Built once at startup and handed to
/// `Authenticator::new` and `TokenValidator::new`.
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub jwt_secret: String,
    /// How long an issued token stays valid.
    pub token_ttl: Duration,
    /// bcrypt cost factor.
    pub hash_cost: u32,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub auth: AuthConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, reason } => write!(f, "{} is invalid: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let ttl_minutes: i64 = parse_or(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?;
        if ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: "must be greater than zero".into(),
            });
        }

        let hash_cost: u32 = parse_or(&lookup, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&hash_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                reason: format!("must be between {} and {}", MIN_BCRYPT_COST, MAX_BCRYPT_COST),
            });
        }

        Ok(Self {
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            auth: AuthConfig {
                jwt_secret,
                token_ttl: Duration::minutes(ttl_minutes),
                hash_cost,
            },
            upload: UploadConfig {
                dir: PathBuf::from(lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string())),
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.auth.token_ttl, Duration::minutes(30));
        assert_eq!(config.auth.hash_cost, 12);
        assert_eq!(config.upload.dir, PathBuf::from("uploads"));
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "secret"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "90"),
            ("BCRYPT_COST", "4"),
            ("UPLOAD_DIR", "/var/lib/fakelive"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.auth.token_ttl, Duration::minutes(90));
        assert_eq!(config.auth.hash_cost, 4);
        assert_eq!(config.upload.dir, PathBuf::from("/var/lib/fakelive"));
    }

    #[test]
    fn test_config_rejects_missing_and_invalid_values() {
        assert_eq!(
            Config::from_lookup(lookup_from(&[("JWT_SECRET", "secret")])).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
        assert_eq!(
            Config::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://test"),
                ("JWT_SECRET", ""),
            ]))
            .unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );

        let bad_cost = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "secret"),
            ("BCRYPT_COST", "2"),
        ]));
        assert!(matches!(bad_cost, Err(ConfigError::Invalid { key: "BCRYPT_COST", .. })));

        let bad_ttl = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "secret"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "0"),
        ]));
        assert!(matches!(
            bad_ttl,
            Err(ConfigError::Invalid { key: "ACCESS_TOKEN_EXPIRE_MINUTES", .. })
        ));

        let bad_port = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "secret"),
            ("SERVER_PORT", "eighty"),
        ]));
        assert!(matches!(bad_port, Err(ConfigError::Invalid { key: "SERVER_PORT", .. })));
    }

    #[test]
    fn test_auth_config_debug_redacts_secret() {
        let auth = AuthConfig {
            jwt_secret: "super-secret".into(),
            token_ttl: Duration::minutes(5),
            hash_cost: 4,
        };
        assert!(!format!("{:?}", auth).contains("super-secret"));
    }
}
