use crate::app::AppState;
use crate::db::agencies;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(ctx: TenantContext, state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    Ok(HttpResponse::Ok().json(agencies::find_agency(&conn, &ctx.agency_id)?))
}
