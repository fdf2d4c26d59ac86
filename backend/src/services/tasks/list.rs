use crate::app::AppState;
use crate::db::tasks;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::requests::TaskQuery;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    query: web::Query<TaskQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    Ok(HttpResponse::Ok().json(tasks::list(&conn, &ctx.agency_id, &query)?))
}
