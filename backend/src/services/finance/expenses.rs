use crate::app::AppState;
use crate::db::{finance, new_id};
use crate::error::{ApiError, ApiResult};
use crate::services::auth::required;
use crate::services::clients::non_blank;
use crate::services::finance::{check_amount, check_period};
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::finance::{Expense, ExpenseStatus};
use common::requests::{ExpenseRequest, PeriodQuery};

fn apply(expense: &mut Expense, req: ExpenseRequest) -> ApiResult<()> {
    if let Some(description) = req.description {
        expense.description = required(&description, "description")?;
    }
    if let Some(amount) = req.amount_cents {
        expense.amount_cents = check_amount(amount)?;
    }
    if let Some(date) = req.date {
        expense.date = date;
    }
    if let Some(category) = req.category {
        expense.category = non_blank(category);
    }
    if let Some(status) = req.status {
        expense.status = status;
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
    Ok(HttpResponse::Ok().json(finance::list_expenses(&conn, &ctx.agency_id, &query)?))
}

pub(crate) async fn create(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<ExpenseRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    if req.description.is_none() || req.amount_cents.is_none() {
        return Err(ApiError::validation("description and amountCents are required"));
    }
    let mut expense = Expense {
        id: new_id(),
        agency_id: ctx.agency_id.clone(),
        description: String::new(),
        amount_cents: 0,
        date: Utc::now().date_naive(),
        category: None,
        status: ExpenseStatus::Pending,
        created_at: Utc::now(),
    };
    apply(&mut expense, req)?;

    let conn = state.db.lock()?;
    finance::insert_expense(&conn, &expense)?;
    Ok(HttpResponse::Created().json(expense))
}

pub(crate) async fn update(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<ExpenseRequest>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    let mut expense = finance::find_expense(&conn, &ctx.agency_id, &id)?;
    apply(&mut expense, body.into_inner())?;
    finance::update_expense(&conn, &expense)?;
    Ok(HttpResponse::Ok().json(expense))
}

pub(crate) async fn delete(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    finance::delete_expense(&conn, &ctx.agency_id, &id)?;
    Ok(HttpResponse::NoContent().finish())
}
