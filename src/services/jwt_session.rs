use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, decode_header,
    jwk::{AlgorithmParameters, JwkSet},
    Algorithm, DecodingKey, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    application::services::SessionResolver,
    domain::{
        config::auth::{JwtAuthConfig, JwtKeySource},
        models::{
            session::{Credentials, Session},
            user::User,
        },
    },
    services::error::AuthError,
};

const RSA_ALGORITHMS: &[Algorithm] = &[
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub exp: i64,
}

struct VerificationKey {
    kid: Option<String>,
    key: DecodingKey,
    algorithms: Vec<Algorithm>,
}

/// Verifies identity-provider JWTs carried in a bearer header or cookie.
pub struct JwtSessionResolver {
    keys: Vec<VerificationKey>,
    cookie_name: String,
    issuer: Option<String>,
    audience: Option<String>,
}

impl JwtSessionResolver {
    pub async fn from_config(config: &JwtAuthConfig) -> Result<Self, AuthError> {
        let keys = match &config.key {
            JwtKeySource::Secret(secret) => vec![VerificationKey {
                kid: None,
                key: DecodingKey::from_secret(secret.as_bytes()),
                algorithms: vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512],
            }],
            JwtKeySource::PublicKeyPem(pem) => vec![VerificationKey {
                kid: None,
                key: DecodingKey::from_rsa_pem(pem.as_bytes())?,
                algorithms: RSA_ALGORITHMS.to_vec(),
            }],
            JwtKeySource::JwksUrl(url) => Self::keys_from_jwks(&fetch_jwks(url).await?)?,
        };
        Ok(Self::with_keys(keys, config))
    }

    pub fn with_jwks(jwks: &JwkSet, config: &JwtAuthConfig) -> Result<Self, AuthError> {
        Ok(Self::with_keys(Self::keys_from_jwks(jwks)?, config))
    }

    fn with_keys(keys: Vec<VerificationKey>, config: &JwtAuthConfig) -> Self {
        Self {
            keys,
            cookie_name: config.cookie_name.clone(),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Asymmetric keys only; shared secrets published in a JWKS are ignored.
    fn keys_from_jwks(jwks: &JwkSet) -> Result<Vec<VerificationKey>, AuthError> {
        let mut keys = Vec::new();
        for jwk in &jwks.keys {
            let algorithms = match &jwk.algorithm {
                AlgorithmParameters::RSA(_) => RSA_ALGORITHMS.to_vec(),
                AlgorithmParameters::EllipticCurve(_) => vec![Algorithm::ES256, Algorithm::ES384],
                AlgorithmParameters::OctetKeyPair(_) => vec![Algorithm::EdDSA],
                _ => continue,
            };
            keys.push(VerificationKey {
                kid: jwk.common.key_id.clone(),
                key: DecodingKey::from_jwk(jwk)?,
                algorithms,
            });
        }

        if keys.is_empty() {
            return Err(AuthError::InvalidKey(
                "JWKS contains no usable asymmetric keys".to_string(),
            ));
        }
        Ok(keys)
    }

    fn verify(&self, token: &str) -> Option<SessionClaims> {
        let header = decode_header(token)
            .map_err(|e| debug!("Malformed JWT header: {}", e))
            .ok()?;

        let candidates = self.keys.iter().filter(|k| {
            k.algorithms.contains(&header.alg)
                && match (&header.kid, &k.kid) {
                    (Some(wanted), Some(kid)) => wanted == kid,
                    _ => true,
                }
        });

        for candidate in candidates {
            let mut validation = Validation::new(header.alg);
            // A configured audience or issuer must be present, not just matching.
            match &self.audience {
                Some(audience) => {
                    validation.set_audience(&[audience]);
                    validation.required_spec_claims.insert("aud".to_string());
                }
                None => validation.validate_aud = false,
            }
            if let Some(issuer) = &self.issuer {
                validation.set_issuer(&[issuer]);
                validation.required_spec_claims.insert("iss".to_string());
            }

            match decode::<SessionClaims>(token, &candidate.key, &validation) {
                Ok(data) => return Some(data.claims),
                Err(e) => debug!("JWT rejected: {}", e),
            }
        }
        None
    }
}

async fn fetch_jwks(url: &str) -> Result<JwkSet, AuthError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let jwks = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<JwkSet>()
        .await?;
    info!("Loaded {} signing keys from {}", jwks.keys.len(), url);
    Ok(jwks)
}

#[async_trait]
impl SessionResolver for JwtSessionResolver {
    async fn resolve_session(&self, credentials: &Credentials) -> Option<Session> {
        let token = credentials.token(&self.cookie_name)?;
        let claims = self.verify(token)?;

        let user_id = claims.sub.filter(|sub| !sub.is_empty())?;
        Some(Session {
            user: User {
                id: user_id,
                email: claims.email,
                name: claims.name,
                image: claims.picture,
                ..Default::default()
            },
            expires_at: DateTime::<Utc>::from_timestamp(claims.exp, 0),
        })
    }

    fn provider_name(&self) -> &'static str {
        "jwt"
    }
}
