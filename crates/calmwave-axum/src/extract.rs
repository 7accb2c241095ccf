//! Request extractors for caller identity and personal credentials.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use calmwave_core::Credential;

use crate::error::HttpError;

/// Header carrying the authenticated caller's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying an optional personal OpenAI key.
pub const OPENAI_KEY_HEADER: &str = "x-openai-key";

/// Prefix every OpenAI secret key carries.
pub const OPENAI_KEY_PREFIX: &str = "sk-";

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, HttpError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(str::trim)
                .map_err(|_| HttpError::BadRequest(format!("{name} header is not valid text")))
        })
        .transpose()
        .map(|value| value.filter(|v| !v.is_empty()))
}

/// The authenticated caller, as identified by the upstream auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(&parts.headers, USER_ID_HEADER)
            .map_err(|_| HttpError::Unauthorized("Unauthorized".to_string()))?
            .ok_or_else(|| HttpError::Unauthorized("Unauthorized".to_string()))?;
        Ok(Self {
            user_id: user_id.to_string(),
        })
    }
}

/// A personal OpenAI key, if the caller sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalKey(pub Option<Credential>);

impl<S: Send + Sync> FromRequestParts<S> for PersonalKey {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match header_value(&parts.headers, OPENAI_KEY_HEADER)? {
            None => Ok(Self(None)),
            Some(key) if key.starts_with(OPENAI_KEY_PREFIX) => Ok(Self(Some(Credential::new(key)))),
            Some(_) => Err(HttpError::BadRequest(format!(
                "API key must start with '{OPENAI_KEY_PREFIX}'"
            ))),
        }
    }
}
