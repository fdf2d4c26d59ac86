//! Registration, login and session management.
//!
//! - `POST /auth/register`: new agency plus its OWNER, returns a session.
//! - `POST /auth/login`: email + password, rate limited per peer and email.
//! - `POST /auth/logout`: drops the calling session.
//! - `GET /auth/me`: the calling user and agency.

mod login;
mod logout;
mod me;
mod register;

use crate::db::agencies;
use crate::error::{ApiError, ApiResult};
use crate::tenant::{password, session};
use actix_web::web::{get, post, scope};
use actix_web::Scope;
use chrono::{Duration, Utc};
use rusqlite::Connection;

const API_PATH: &str = "/auth";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/register", post().to(register::process))
        .route("/login", post().to(login::process))
        .route("/logout", post().to(logout::process))
        .route("/me", get().to(me::process))
}

/// Stores a new session for `user_id` and returns the raw token.
pub(crate) fn open_session(conn: &Connection, user_id: &str, ttl_hours: i64) -> ApiResult<String> {
    let token = session::new_token();
    let expires_at = Utc::now() + Duration::hours(ttl_hours.max(1));
    agencies::insert_session(conn, &session::hash_token(&token), user_id, expires_at)?;
    Ok(token)
}

pub(crate) fn validate_email(email: &str) -> ApiResult<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ApiError::validation("a valid email is required"));
    }
    Ok(email)
}

pub(crate) fn validate_password(password: &str) -> ApiResult<()> {
    if password.chars().count() < password::MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "password must have at least {} characters",
            password::MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub(crate) fn required(value: &str, field: &str) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert_eq!(validate_email(" Ana@Agencia.com ").unwrap(), "ana@agencia.com");
        assert!(validate_email("ana").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("ana@localhost").is_err());
    }
}
