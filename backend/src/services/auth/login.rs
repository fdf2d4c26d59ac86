use crate::app::AppState;
use crate::db::agencies;
use crate::error::{ApiError, ApiResult};
use crate::rate_limit::enforce;
use crate::services::auth::open_session;
use crate::tenant::password;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::agency::Session;
use common::requests::LoginRequest;
use log::{info, warn};

const INVALID_CREDENTIALS: &str = "invalid email or password";

pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = body.into_inner();
    let email = email.trim().to_lowercase();

    let peer = req
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    enforce(state.limiters.auth.as_ref(), &format!("login:{}:{}", peer, email))?;

    let found = {
        let conn = state.db.lock()?;
        agencies::find_user_by_email(&conn, &email)?
    };
    let Some(found) = found else {
        warn!("login attempt for unknown email from {}", peer);
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let hash = found.password_hash;
    let valid = web::block(move || password::verify_password(&password, &hash)).await?;
    if !valid {
        warn!("failed login for user {} from {}", found.user.id, peer);
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let user = found.user;
    let conn = state.db.lock()?;
    let agency = agencies::find_agency(&conn, &user.agency_id)?;
    let token = open_session(&conn, &user.id, state.settings.auth.session_ttl_hours)?;

    info!("user {} logged in to agency {}", user.id, agency.id);
    Ok(HttpResponse::Ok().json(Session { token, user, agency }))
}
