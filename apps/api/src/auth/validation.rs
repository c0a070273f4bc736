//! Input validation for signup and lead capture.

use regex::Regex;
use std::sync::OnceLock;

use crate::errors::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email regex is valid")
    })
}

pub fn validate_required(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required("Email", email)?;
    if email.len() > 254 || !email_regex().is_match(email.trim()) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

/// Accepts 7 to 15 digits, ignoring spaces, dashes, parentheses and a leading '+'.
pub fn validate_mobile(mobile: &str) -> Result<(), AppError> {
    validate_required("Mobile", mobile)?;
    let trimmed = mobile.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let mut digits = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '(' | ')' => {}
            _ => return Err(AppError::Validation("Invalid mobile number".to_string())),
        }
    }
    if !(7..=15).contains(&digits) {
        return Err(AppError::Validation("Invalid mobile number".to_string()));
    }
    Ok(())
}
