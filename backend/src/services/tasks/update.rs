use crate::app::AppState;
use crate::db::tasks;
use crate::error::ApiResult;
use crate::services::tasks::apply;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::requests::TaskRequest;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<TaskRequest>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    let mut task = tasks::find(&conn, &ctx.agency_id, &id)?;
    apply(&conn, &mut task, body.into_inner())?;
    task.updated_at = Utc::now();
    tasks::update(&conn, &task)?;
    Ok(HttpResponse::Ok().json(task))
}
