use crate::app::AppState;
use crate::db::tasks;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    tasks::delete(&conn, &ctx.agency_id, &id)?;
    Ok(HttpResponse::NoContent().finish())
}
