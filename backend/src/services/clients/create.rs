use crate::app::AppState;
use crate::db::{clients, new_id};
use crate::error::{ApiError, ApiResult};
use crate::services::clients::apply;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::client::{Client, ClientStatus};
use common::requests::ClientRequest;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<ClientRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    if req.name.is_none() {
        return Err(ApiError::validation("name is required"));
    }
    let now = Utc::now();
    let mut client = Client {
        id: new_id(),
        agency_id: ctx.agency_id.clone(),
        name: String::new(),
        email: None,
        phone: None,
        company: None,
        notes: None,
        status: ClientStatus::Lead,
        created_at: now,
        updated_at: now,
    };
    apply(&mut client, req)?;

    let conn = state.db.lock()?;
    clients::insert(&conn, &client)?;
    Ok(HttpResponse::Created().json(client))
}
