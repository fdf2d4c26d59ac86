use crate::app::AppState;
use crate::db::agencies;
use crate::error::{ApiError, ApiResult};
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::model::agency::Role;
use log::info;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    ctx.require_role(Role::Owner)?;
    let id = id.into_inner();
    if id == ctx.user_id {
        return Err(ApiError::validation("you cannot remove yourself"));
    }
    let conn = state.db.lock()?;
    agencies::delete_user(&conn, &ctx.agency_id, &id)?;
    info!("user {} removed member {} from agency {}", ctx.user_id, id, ctx.agency_id);
    Ok(HttpResponse::NoContent().finish())
}
