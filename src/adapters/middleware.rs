use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    application::{error::ApplicationError, services::AccessGuard},
    domain::models::session::Credentials,
};

/// Resolves the caller's session and stores it as a request extension;
/// responds 401 when there is none.
pub async fn require_session(
    State(access_guard): State<AccessGuard>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let credentials = extract_credentials(request.headers());

    match access_guard.authenticate(&credentials).await {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => ApplicationError::Unauthorized.into_response(),
    }
}

pub fn extract_credentials(headers: &HeaderMap) -> Credentials {
    let bearer_token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    let mut credentials = Credentials {
        bearer_token,
        ..Default::default()
    };

    for value in headers.get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            if let Some((name, cookie_value)) = pair.trim().split_once('=') {
                credentials
                    .cookies
                    .insert(name.trim().to_string(), cookie_value.trim().to_string());
            }
        }
    }

    credentials
}
