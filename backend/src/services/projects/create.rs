use crate::app::AppState;
use crate::db::{new_id, projects};
use crate::error::{ApiError, ApiResult};
use crate::services::projects::apply;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::project::{Project, ProjectStatus};
use common::requests::ProjectRequest;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<ProjectRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    if req.name.is_none() {
        return Err(ApiError::validation("name is required"));
    }
    let now = Utc::now();
    let mut project = Project {
        id: new_id(),
        agency_id: ctx.agency_id.clone(),
        client_id: None,
        name: String::new(),
        description: None,
        status: ProjectStatus::Planning,
        budget_cents: None,
        start_date: None,
        due_date: None,
        created_at: now,
        updated_at: now,
    };

    let conn = state.db.lock()?;
    apply(&conn, &mut project, req)?;
    projects::insert(&conn, &project)?;
    Ok(HttpResponse::Created().json(project))
}
