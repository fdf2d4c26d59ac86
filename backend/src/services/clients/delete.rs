use crate::app::AppState;
use crate::db::clients;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};

/// Projects and revenues of the client keep existing with no client.
pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    clients::delete(&conn, &ctx.agency_id, &id)?;
    Ok(HttpResponse::NoContent().finish())
}
