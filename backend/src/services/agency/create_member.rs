use crate::app::AppState;
use crate::db::agencies;
use crate::error::{ApiError, ApiResult};
use crate::services::auth::{required, validate_email, validate_password};
use crate::tenant::{password, TenantContext};
use actix_web::{web, HttpResponse};
use common::model::agency::Role;
use common::requests::CreateMemberRequest;
use log::info;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<CreateMemberRequest>,
) -> ApiResult<HttpResponse> {
    ctx.require_role(Role::Admin)?;
    let req = body.into_inner();
    if req.role != Role::Member && ctx.role != Role::Owner {
        return Err(ApiError::Forbidden(
            "only an OWNER can add ADMIN or OWNER members".to_string(),
        ));
    }
    let name = required(&req.name, "name")?;
    let email = validate_email(&req.email)?;
    validate_password(&req.password)?;

    let hash = web::block(move || password::hash_password(&req.password)).await??;
    let conn = state.db.lock()?;
    let user = agencies::insert_user(&conn, &ctx.agency_id, &name, &email, &hash, req.role)?;

    info!("user {} added {} as {} to agency {}", ctx.user_id, user.id, user.role, ctx.agency_id);
    Ok(HttpResponse::Created().json(user))
}
