use crate::app::AppState;
use crate::db::agencies;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::model::agency::Me;

pub(crate) async fn process(ctx: TenantContext, state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    let user = agencies::find_user(&conn, &ctx.agency_id, &ctx.user_id)?;
    let agency = agencies::find_agency(&conn, &ctx.agency_id)?;
    Ok(HttpResponse::Ok().json(Me { user, agency }))
}
