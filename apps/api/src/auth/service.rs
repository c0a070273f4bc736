use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::auth::validation::{validate_email, validate_password, validate_required};
use crate::errors::AppError;
use crate::models::{NewAccount, PublicAccount};
use crate::store::AccountStore;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicAccount,
}

#[derive(Debug, Serialize)]
pub struct RecoverUsernameResponse {
    pub username: String,
}

pub async fn register(
    accounts: &dyn AccountStore,
    tokens: &TokenService,
    request: RegisterRequest,
    now: DateTime<Utc>,
) -> Result<AuthResponse, AppError> {
    let username = request.username.trim();
    let email = request.email.trim().to_lowercase();

    validate_required("Username", username)?;
    validate_email(&email)?;
    validate_password(&request.password)?;

    if accounts.username_or_email_taken(username, &email).await? {
        return Err(AppError::Conflict(
            "Username or email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&request.password)?;
    // The store maps a unique violation to Conflict, covering signups that race the check above.
    let account = accounts
        .insert(
            NewAccount {
                username: username.to_string(),
                email,
                password_hash,
            },
            now,
        )
        .await?;

    let token = tokens.issue(account.id, account.role, now)?;
    info!("Registered account {}", account.id);

    Ok(AuthResponse {
        token,
        user: PublicAccount::from(&account),
    })
}

pub async fn authenticate(
    accounts: &dyn AccountStore,
    tokens: &TokenService,
    request: LoginRequest,
    now: DateTime<Utc>,
) -> Result<AuthResponse, AppError> {
    let identifier = request.identifier.trim();
    validate_required("Identifier", identifier)?;
    validate_required("Password", &request.password)?;

    let mut account = accounts
        .find_by_identifier(identifier)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !verify_password(&request.password, &account.password_hash)? {
        warn!("Failed login for account {}", account.id);
        return Err(AppError::InvalidCredentials);
    }

    if account.is_blocked() {
        return Err(AppError::Forbidden(
            "Your account has been blocked. Please contact support.".to_string(),
        ));
    }

    accounts.record_login(account.id, now).await?;
    account.last_login = Some(now);

    let token = tokens.issue(account.id, account.role, now)?;
    info!("Account {} logged in", account.id);

    Ok(AuthResponse {
        token,
        user: PublicAccount::from(&account),
    })
}

pub async fn recover_username(
    accounts: &dyn AccountStore,
    email: &str,
) -> Result<RecoverUsernameResponse, AppError> {
    validate_required("Email", email)?;
    let account = accounts
        .find_by_email(email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("No account found with this email".to_string()))?;

    Ok(RecoverUsernameResponse {
        username: account.username,
    })
}
