use std::env;
use std::fmt;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub cookie: CookieConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    pub expiration_hours: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &format_args!("<{} bytes>", self.secret.len()))
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    /// Base two logarithm of the Argon2 memory cost.
    pub cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    pub secure: bool,
}

/// Flat environment variables accepted next to the `AUTH__SECTION__KEY` form.
#[derive(Debug, Clone, Default)]
pub struct EnvAliases {
    /// `JWT_SECRET`
    pub jwt_secret: Option<String>,
    /// `DB_URL`
    pub database_url: Option<String>,
    /// `PORT`
    pub port: Option<String>,
}

impl EnvAliases {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: env::var("JWT_SECRET").ok(),
            database_url: env::var("DB_URL").ok(),
            port: env::var("PORT").ok(),
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. `JWT_SECRET`, `DB_URL` and `PORT`
    /// 2. Environment variables (AUTH__DATABASE__URL, AUTH__SERVER__HTTP_PORT, etc.)
    /// 3. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 4. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE")
            .or_else(|_| env::var("ENVI"))
            .unwrap_or_else(|_| "development".to_string());

        Self::build(&run_mode, EnvAliases::from_env())
    }

    /// Assemble and validate configuration for `run_mode`.
    pub fn build(run_mode: &str, aliases: EnvAliases) -> Result<Self, ConfigError> {
        let local = Self::is_local_mode(run_mode);

        let configuration = ConfigBuilder::builder()
            .set_default("server.host", if run_mode == "local" { "127.0.0.1" } else { "0.0.0.0" })?
            .set_default("server.http_port", 8080)?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_hours", 24)?
            .set_default("password.cost", auth::PasswordHasher::DEFAULT_COST)?
            .set_default("cookie.secure", !local)?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__DATABASE__URL=postgres://... overrides database.url
            .add_source(
                Environment::with_prefix("AUTH")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .set_override_option("jwt.secret", aliases.jwt_secret)?
            .set_override_option("database.url", aliases.database_url)?
            .set_override_option("server.http_port", aliases.port)?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations the service must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (JWT_SECRET)".to_string(),
            ));
        }
        if self.database.url.is_empty() {
            return Err(ConfigError::Message(
                "database.url must be set (DB_URL)".to_string(),
            ));
        }
        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be positive, got {}",
                self.jwt.expiration_hours
            )));
        }
        if self.password.cost < auth::PasswordHasher::MIN_COST {
            return Err(ConfigError::Message(format!(
                "password.cost must be at least {}, got {}",
                auth::PasswordHasher::MIN_COST,
                self.password.cost
            )));
        }

        Ok(())
    }

    /// Modes where plain-HTTP cookies are acceptable.
    pub fn is_local_mode(run_mode: &str) -> bool {
        matches!(run_mode, "local" | "development")
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.jwt.expiration_hours)
    }
}
