/// Configuration management for the API server
///
/// Configuration comes from environment variables, with a `.env` file
/// loaded first when present.
///
/// # Environment Variables
///
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8080)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `JWT_SECRET`: token signing secret, at least 32 characters (required)
/// - `JWT_ISSUER`: token issuer (default: taskboard)
/// - `JWT_AUDIENCE`: token audience (default: taskboard-clients)
/// - `CORS_ORIGINS`: comma-separated origins, `*` for any (default: http://localhost:3000)
/// - `ADMIN_NAME` / `ADMIN_PASSWORD`: bootstrap administrator, both or neither
/// - `RUST_LOG`: log filter
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use taskboard_shared::auth::jwt::JwtSettings;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Administrator created at startup if missing
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Expected `iss` claim
    pub issuer: String,

    /// Expected `aud` claim
    pub audience: String,
}

/// Bootstrap administrator credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    /// Login handle
    pub name: String,

    /// Plaintext password
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is
    /// invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var_or("API_HOST", "0.0.0.0");
        let port = var_or("API_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is not a valid port: {}", e))?;

        let cors_origins = var_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = var_or("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is not a number: {}", e))?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let bootstrap_admin = match (lookup("ADMIN_NAME"), lookup("ADMIN_PASSWORD")) {
            (Some(name), Some(password)) => Some(BootstrapAdmin { name, password }),
            (None, None) => None,
            _ => anyhow::bail!("ADMIN_NAME and ADMIN_PASSWORD must be set together"),
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                issuer: var_or("JWT_ISSUER", "taskboard"),
                audience: var_or("JWT_AUDIENCE", "taskboard-clients"),
            },
            bootstrap_admin,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Token settings derived from the JWT section
    pub fn jwt_settings(&self) -> JwtSettings {
        JwtSettings::new(
            self.jwt.secret.clone(),
            self.jwt.issuer.clone(),
            self.jwt.audience.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgresql://localhost/test"), ("JWT_SECRET", SECRET)])
            .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.api.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.jwt.issuer, "taskboard");
        assert_eq!(config.jwt.audience, "taskboard-clients");
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgresql://db/taskboard"),
            ("JWT_SECRET", SECRET),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "9000"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("ADMIN_NAME", "root"),
            ("ADMIN_PASSWORD", "bootstrap-password"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.api.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.bootstrap_admin.map(|a| a.name).as_deref(), Some("root"));
    }

    #[test]
    fn test_missing_required_values() {
        assert!(load(&[("JWT_SECRET", SECRET)]).is_err());
        assert!(load(&[("DATABASE_URL", "postgresql://localhost/test")]).is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = load(&[("DATABASE_URL", "postgresql://localhost/test"), ("JWT_SECRET", "short")])
            .unwrap_err();
        assert!(err.to_string().contains("at least 32 characters"));
    }

    #[test]
    fn test_half_configured_admin_rejected() {
        assert!(load(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
            ("ADMIN_NAME", "root"),
        ])
        .is_err());
    }

    #[test]
    fn test_bad_port() {
        assert!(load(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
            ("API_PORT", "eighty"),
        ])
        .is_err());
    }
}
