use crate::app::AppState;
use crate::db::agencies;
use crate::error::ApiResult;
use crate::services::auth::required;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::model::agency::Role;
use common::requests::UpdateAgencyRequest;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<UpdateAgencyRequest>,
) -> ApiResult<HttpResponse> {
    ctx.require_role(Role::Admin)?;
    let req = body.into_inner();

    let conn = state.db.lock()?;
    let mut agency = agencies::find_agency(&conn, &ctx.agency_id)?;
    if let Some(name) = req.name {
        agency.name = required(&name, "name")?;
        agency.slug = agencies::slugify(&agency.name);
    }
    if let Some(plan) = req.plan {
        agency.plan = plan;
    }
    agencies::update_agency(&conn, &agency)?;
    Ok(HttpResponse::Ok().json(agency))
}
