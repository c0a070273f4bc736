//! Bearer-token extractors for handlers.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Role;
use crate::resumes::ownership::Caller;
use crate::state::AppState;

/// An authenticated account, taken from a valid `Authorization: Bearer` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }
}

/// Like [`AuthUser`] but lets guests through. A header that is present but
/// invalid is still rejected.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn caller(&self) -> Caller {
        match self.0 {
            Some(user) => Caller::Account {
                id: user.id,
                role: user.role,
            },
            None => Caller::Guest,
        }
    }
}

impl From<AuthUser> for Caller {
    fn from(user: AuthUser) -> Self {
        Caller::Account {
            id: user.id,
            role: user.role,
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header.to_str().map_err(|_| AppError::unauthorized())?;
    value
        .strip_prefix("Bearer ")
        .map(|token| Some(token.trim()))
        .ok_or_else(AppError::unauthorized)
}

fn authenticate(token: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let claims = state.tokens.validate(token)?;
    Ok(AuthUser {
        id: claims.sub,
        role: claims.role,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(AppError::unauthorized)?;
        authenticate(token, state)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(MaybeAuthUser(Some(authenticate(token, state)?))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}
