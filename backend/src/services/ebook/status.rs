use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};

/// Jobs of other agencies are reported as unknown.
pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    job_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    match state.jobs.get(&job_id).await {
        Some(job) if job.data.agency_id == ctx.agency_id => Ok(HttpResponse::Ok().json(job.view())),
        _ => Err(ApiError::not_found("job")),
    }
}
