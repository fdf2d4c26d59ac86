use crate::app::AppState;
use crate::db::projects;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::requests::ProjectQuery;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    query: web::Query<ProjectQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    Ok(HttpResponse::Ok().json(projects::list(&conn, &ctx.agency_id, &query)?))
}
