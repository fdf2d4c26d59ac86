use crate::app::AppState;
use crate::db::clients;
use crate::error::ApiResult;
use crate::services::clients::apply;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::requests::ClientRequest;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<ClientRequest>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    let mut client = clients::find(&conn, &ctx.agency_id, &id)?;
    apply(&mut client, body.into_inner())?;
    client.updated_at = Utc::now();
    clients::update(&conn, &client)?;
    Ok(HttpResponse::Ok().json(client))
}
