use crate::app::AppState;
use crate::db::clients;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::requests::ClientQuery;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    query: web::Query<ClientQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    Ok(HttpResponse::Ok().json(clients::list(&conn, &ctx.agency_id, &query)?))
}
