use crate::app::AppState;
use crate::db::agencies;
use crate::error::ApiResult;
use crate::services::auth::{open_session, required, validate_email, validate_password};
use crate::tenant::password;
use actix_web::{web, HttpResponse};
use common::model::agency::{Plan, Role, Session};
use common::requests::RegisterRequest;
use log::info;

pub(crate) async fn process(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let agency_name = required(&req.agency_name, "agencyName")?;
    let name = required(&req.name, "name")?;
    let email = validate_email(&req.email)?;
    validate_password(&req.password)?;

    let hash = web::block(move || password::hash_password(&req.password)).await??;

    let conn = state.db.lock()?;
    let tx = conn.unchecked_transaction()?;
    let agency = agencies::insert_agency(&tx, &agency_name, Plan::Free)?;
    let user = agencies::insert_user(&tx, &agency.id, &name, &email, &hash, Role::Owner)?;
    let token = open_session(&tx, &user.id, state.settings.auth.session_ttl_hours)?;
    tx.commit()?;

    info!("registered agency {} ({}) with owner {}", agency.id, agency.slug, user.id);
    Ok(HttpResponse::Created().json(Session { token, user, agency }))
}
