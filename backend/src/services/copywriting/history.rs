use crate::app::AppState;
use crate::db::contents;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::requests::HistoryQuery;

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
) -> ApiResult<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let conn = state.db.lock()?;
    Ok(HttpResponse::Ok().json(contents::list(&conn, &ctx.agency_id, query.kind, limit)?))
}
