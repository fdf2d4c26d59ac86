use crate::app::AppState;
use crate::db::projects;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use log::info;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    projects::delete(&conn, &ctx.agency_id, &id)?;
    info!("project {} deleted by {}", id, ctx.user_id);
    Ok(HttpResponse::NoContent().finish())
}
