//! Explicit per-request tenant context.
//!
//! Handlers that touch agency data take a `TenantContext` argument; actix
//! resolves it from the `Authorization: Bearer <token>` header before the
//! handler runs. There is no ambient session state anywhere else.

pub mod password;
pub mod session;

use crate::app::AppState;
use crate::db::agencies;
use crate::error::{ApiError, ApiResult};
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::Utc;
use common::model::agency::Role;
use futures_util::future::{ready, Ready};

#[derive(Debug, Clone)]
pub struct TenantContext {
    pub user_id: String,
    pub agency_id: String,
    pub role: Role,
    pub(crate) token_hash: String,
}

impl TenantContext {
    /// 403 unless the caller's role is at least `min`.
    pub fn require_role(&self, min: Role) -> ApiResult<()> {
        if self.role.level() < min.level() {
            return Err(ApiError::Forbidden(format!(
                "requires role {} or higher",
                min
            )));
        }
        Ok(())
    }
}

pub(crate) fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn resolve(req: &HttpRequest) -> ApiResult<TenantContext> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("application state not configured".to_string()))?;
    let token = bearer_token(req)
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;
    let token_hash = session::hash_token(token);

    let conn = state.db.lock()?;
    let user = agencies::find_session_user(&conn, &token_hash, Utc::now())?
        .ok_or_else(|| ApiError::Unauthorized("invalid or expired session".to_string()))?;

    Ok(TenantContext {
        user_id: user.id,
        agency_id: user.agency_id,
        role: user.role,
        token_hash,
    })
}

impl FromRequest for TenantContext {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}
