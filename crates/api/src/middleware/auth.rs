//! Actor resolution from bearer tokens.
//!
//! Token issuance lives in the external identity service; this extractor
//! only verifies the signature and reads the actor id and role out of the
//! claims.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;

use fabriq_core::types::DbId;
use fabriq_lifecycle::Actor;

use crate::error::AppError;
use crate::state::AppState;

/// JWT claims issued by the identity service.
#[derive(Debug, Deserialize)]
pub struct Claims {
    /// Actor id (stringified BIGSERIAL).
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

/// The authenticated caller, extracted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: DbId,
    pub role: String,
}

impl AuthUser {
    /// View as a lifecycle actor.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role.clone(),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Expected a bearer token".into()))?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {e}")))?;

        let id: DbId = data
            .claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid subject claim".into()))?;

        Ok(AuthUser {
            id,
            role: data.claims.role,
        })
    }
}
