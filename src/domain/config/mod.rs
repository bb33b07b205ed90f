pub mod auth;
pub mod server;
pub mod storage;

use thiserror::Error;

use auth::{
    AuthConfig, DatabaseAuthConfig, JwtAuthConfig, JwtKeySource, DEFAULT_JWT_COOKIE,
    DEFAULT_SESSION_COOKIE,
};
use server::ServerConfig;
use storage::{StorageConfig, DEFAULT_PRESIGN_TTL_SECS};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let server = ServerConfig {
            port: vars.parsed("PORT", 8080)?,
            database_url: vars.required("DATABASE_URL")?,
            database_max_connections: vars.parsed("DATABASE_MAX_CONNECTIONS", 5)?,
            cors_allowed_origins: vars.optional("CORS_ALLOWED_ORIGINS").map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        };

        let endpoint = vars.optional("STORAGE_ENDPOINT").or_else(|| {
            vars.optional("STORAGE_ACCOUNT_ID")
                .map(|account| format!("https://{}.r2.cloudflarestorage.com", account))
        });
        let storage = StorageConfig {
            bucket_name: vars.required("STORAGE_BUCKET")?,
            region: vars
                .optional("STORAGE_REGION")
                .unwrap_or_else(|| "auto".to_string()),
            force_path_style: vars.parsed("STORAGE_FORCE_PATH_STYLE", endpoint.is_some())?,
            endpoint,
            access_key_id: vars.required("STORAGE_ACCESS_KEY_ID")?,
            secret_access_key: vars.required("STORAGE_SECRET_ACCESS_KEY")?,
            public_url: vars.optional("STORAGE_PUBLIC_URL"),
            presign_ttl_secs: vars.parsed("PRESIGN_TTL_SECONDS", DEFAULT_PRESIGN_TTL_SECS)?,
        };

        let provider = vars
            .optional("AUTH_PROVIDER")
            .unwrap_or_else(|| "jwt".to_string());
        let auth = match provider.to_ascii_lowercase().as_str() {
            "jwt" => {
                let key = if let Some(url) = vars.optional("AUTH_JWKS_URL") {
                    JwtKeySource::JwksUrl(url)
                } else if let Some(pem) = vars.optional("AUTH_JWT_PUBLIC_KEY") {
                    JwtKeySource::PublicKeyPem(pem)
                } else if let Some(secret) = vars.optional("AUTH_JWT_SECRET") {
                    JwtKeySource::Secret(secret)
                } else {
                    return Err(ConfigError::Missing("AUTH_JWT_SECRET"));
                };
                AuthConfig::Jwt(JwtAuthConfig {
                    key,
                    cookie_name: vars
                        .optional("AUTH_COOKIE_NAME")
                        .unwrap_or_else(|| DEFAULT_JWT_COOKIE.to_string()),
                    issuer: vars.optional("AUTH_JWT_ISSUER"),
                    audience: vars.optional("AUTH_JWT_AUDIENCE"),
                })
            }
            "database" => AuthConfig::Database(DatabaseAuthConfig {
                cookie_name: vars
                    .optional("AUTH_COOKIE_NAME")
                    .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string()),
            }),
            other => {
                return Err(ConfigError::Invalid {
                    name: "AUTH_PROVIDER",
                    reason: format!("unknown provider '{}'", other),
                })
            }
        };

        Ok(Self {
            server,
            storage,
            auth,
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn parsed<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }
}
