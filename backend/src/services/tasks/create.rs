use crate::app::AppState;
use crate::db::{new_id, projects, tasks};
use crate::error::{ApiError, ApiResult};
use crate::services::tasks::apply;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::task::{Task, TaskPriority, TaskStatus};
use common::requests::TaskRequest;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<TaskRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let project_id = req
        .project_id
        .clone()
        .ok_or_else(|| ApiError::validation("projectId is required"))?;
    if req.title.is_none() {
        return Err(ApiError::validation("title is required"));
    }

    let conn = state.db.lock()?;
    let project = projects::find(&conn, &ctx.agency_id, &project_id)?;
    let now = Utc::now();
    let mut task = Task {
        id: new_id(),
        agency_id: ctx.agency_id.clone(),
        project_id: project.id,
        title: String::new(),
        description: None,
        status: req.status.unwrap_or(TaskStatus::Todo),
        priority: TaskPriority::Medium,
        position: 0,
        assignee_id: None,
        due_date: None,
        created_at: now,
        updated_at: now,
    };
    apply(&conn, &mut task, req)?;
    tasks::insert(&conn, &mut task)?;
    Ok(HttpResponse::Created().json(task))
}
