use crate::app::AppState;
use crate::db::tasks;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::requests::MoveTaskRequest;
use log::debug;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<MoveTaskRequest>,
) -> ApiResult<HttpResponse> {
    let MoveTaskRequest { status, position } = body.into_inner();
    let conn = state.db.lock()?;
    let task = tasks::move_to(&conn, &ctx.agency_id, &id, status, position)?;
    debug!("task {} moved to {}#{}", task.id, task.status, task.position);
    Ok(HttpResponse::Ok().json(task))
}
