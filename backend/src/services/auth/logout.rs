use crate::app::AppState;
use crate::db::agencies;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(ctx: TenantContext, state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    agencies::delete_session(&conn, &ctx.token_hash)?;
    Ok(HttpResponse::NoContent().finish())
}
