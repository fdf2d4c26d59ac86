use crate::app::AppState;
use crate::db::projects;
use crate::error::ApiResult;
use crate::services::projects::apply;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::requests::ProjectRequest;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<ProjectRequest>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    let mut project = projects::find(&conn, &ctx.agency_id, &id)?;
    apply(&conn, &mut project, body.into_inner())?;
    project.updated_at = Utc::now();
    projects::update(&conn, &project)?;
    Ok(HttpResponse::Ok().json(project))
}
