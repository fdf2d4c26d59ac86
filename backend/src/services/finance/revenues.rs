use crate::app::AppState;
use crate::db::{clients, finance, new_id};
use crate::error::{ApiError, ApiResult};
use crate::services::auth::required;
use crate::services::clients::non_blank;
use crate::services::finance::{check_amount, check_period};
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::finance::{Revenue, RevenueStatus};
use common::requests::{PeriodQuery, RevenueRequest};
use rusqlite::Connection;

fn apply(conn: &Connection, revenue: &mut Revenue, req: RevenueRequest) -> ApiResult<()> {
    if let Some(client_id) = req.client_id {
        revenue.client_id = match non_blank(client_id) {
            Some(id) => Some(clients::find(conn, &revenue.agency_id, &id)?.id),
            None => None,
        };
    }
    if let Some(description) = req.description {
        revenue.description = required(&description, "description")?;
    }
    if let Some(amount) = req.amount_cents {
        revenue.amount_cents = check_amount(amount)?;
    }
    if let Some(date) = req.date {
        revenue.date = date;
    }
    if let Some(category) = req.category {
        revenue.category = non_blank(category);
    }
    if let Some(status) = req.status {
        revenue.status = status;
    }
    Ok(())
}

pub(crate) async fn list(
    ctx: TenantContext,
    state: web::Data<AppState>,
    query: web::Query<PeriodQuery>,
) -> ApiResult<HttpResponse> {
    check_period(&query)?;
    let conn = state.db.lock()?;
    Ok(HttpResponse::Ok().json(finance::list_revenues(&conn, &ctx.agency_id, &query)?))
}

pub(crate) async fn create(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<RevenueRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    if req.description.is_none() || req.amount_cents.is_none() {
        return Err(ApiError::validation("description and amountCents are required"));
    }
    let mut revenue = Revenue {
        id: new_id(),
        agency_id: ctx.agency_id.clone(),
        client_id: None,
        description: String::new(),
        amount_cents: 0,
        date: Utc::now().date_naive(),
        category: None,
        status: RevenueStatus::Pending,
        created_at: Utc::now(),
    };

    let conn = state.db.lock()?;
    apply(&conn, &mut revenue, req)?;
    finance::insert_revenue(&conn, &revenue)?;
    Ok(HttpResponse::Created().json(revenue))
}

pub(crate) async fn update(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<RevenueRequest>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    let mut revenue = finance::find_revenue(&conn, &ctx.agency_id, &id)?;
    apply(&conn, &mut revenue, body.into_inner())?;
    finance::update_revenue(&conn, &revenue)?;
    Ok(HttpResponse::Ok().json(revenue))
}

pub(crate) async fn delete(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    finance::delete_revenue(&conn, &ctx.agency_id, &id)?;
    Ok(HttpResponse::NoContent().finish())
}
