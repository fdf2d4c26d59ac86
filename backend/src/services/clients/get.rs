use crate::app::AppState;
use crate::db::clients;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    Ok(HttpResponse::Ok().json(clients::find(&conn, &ctx.agency_id, &id)?))
}
