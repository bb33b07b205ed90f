pub const DEFAULT_JWT_COOKIE: &str = "neon_auth_token";
pub const DEFAULT_SESSION_COOKIE: &str = "better-auth.session_token";

#[derive(Debug, Clone, PartialEq)]
pub enum JwtKeySource {
    Secret(String),
    PublicKeyPem(String),
    JwksUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JwtAuthConfig {
    pub key: JwtKeySource,
    pub cookie_name: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseAuthConfig {
    pub cookie_name: String,
}

/// Which session backend resolves callers. Chosen once at start-up.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthConfig {
    Jwt(JwtAuthConfig),
    Database(DatabaseAuthConfig),
}
