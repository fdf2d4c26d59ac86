use crate::app::AppState;
use crate::db::finance;
use crate::error::ApiResult;
use crate::services::finance::check_period;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::model::finance::{
    CategoryTotal, Expense, ExpenseStatus, FinanceSummary, Revenue, RevenueStatus,
};
use common::requests::PeriodQuery;
use std::collections::BTreeMap;

const UNCATEGORIZED: &str = "Sem categoria";

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    query: web::Query<PeriodQuery>,
) -> ApiResult<HttpResponse> {
    check_period(&query)?;
    let conn = state.db.lock()?;
    let revenues = finance::list_revenues(&conn, &ctx.agency_id, &query)?;
    let expenses = finance::list_expenses(&conn, &ctx.agency_id, &query)?;
    Ok(HttpResponse::Ok().json(summarize(&revenues, &expenses)))
}

fn category_entry<'a>(
    categories: &'a mut BTreeMap<String, CategoryTotal>,
    category: &Option<String>,
) -> &'a mut CategoryTotal {
    let name = category.as_deref().unwrap_or(UNCATEGORIZED);
    categories
        .entry(name.to_string())
        .or_insert_with(|| CategoryTotal {
            category: name.to_string(),
            ..CategoryTotal::default()
        })
}

/// Totals per status plus per-category sums, categories sorted by name.
pub(crate) fn summarize(revenues: &[Revenue], expenses: &[Expense]) -> FinanceSummary {
    let mut summary = FinanceSummary::default();
    let mut categories: BTreeMap<String, CategoryTotal> = BTreeMap::new();

    for revenue in revenues {
        summary.revenue_cents += revenue.amount_cents;
        match revenue.status {
            RevenueStatus::Received => summary.received_cents += revenue.amount_cents,
            RevenueStatus::Pending => summary.pending_revenue_cents += revenue.amount_cents,
        }
        category_entry(&mut categories, &revenue.category).revenue_cents += revenue.amount_cents;
    }
    for expense in expenses {
        summary.expense_cents += expense.amount_cents;
        match expense.status {
            ExpenseStatus::Paid => summary.paid_cents += expense.amount_cents,
            ExpenseStatus::Pending => summary.pending_expense_cents += expense.amount_cents,
        }
        category_entry(&mut categories, &expense.category).expense_cents += expense.amount_cents;
    }

    summary.balance_cents = summary.received_cents - summary.paid_cents;
    summary.projected_balance_cents = summary.revenue_cents - summary.expense_cents;
    summary.by_category = categories.into_values().collect();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn revenue(amount: i64, status: RevenueStatus, category: Option<&str>) -> Revenue {
        Revenue {
            id: "r".to_string(),
            agency_id: "a".to_string(),
            client_id: None,
            description: "receita".to_string(),
            amount_cents: amount,
            date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            category: category.map(str::to_string),
            status,
            created_at: Utc::now(),
        }
    }

    fn expense(amount: i64, status: ExpenseStatus, category: Option<&str>) -> Expense {
        Expense {
            id: "e".to_string(),
            agency_id: "a".to_string(),
            description: "despesa".to_string(),
            amount_cents: amount,
            date: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            category: category.map(str::to_string),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn arithmetic() {
        let summary = summarize(
            &[
                revenue(10_000, RevenueStatus::Received, Some("Social")),
                revenue(5_000, RevenueStatus::Pending, None),
            ],
            &[
                expense(3_000, ExpenseStatus::Paid, Some("Social")),
                expense(1_000, ExpenseStatus::Pending, Some("Ferramentas")),
            ],
        );
        assert_eq!(summary.revenue_cents, 15_000);
        assert_eq!(summary.received_cents, 10_000);
        assert_eq!(summary.pending_revenue_cents, 5_000);
        assert_eq!(summary.expense_cents, 4_000);
        assert_eq!(summary.paid_cents, 3_000);
        assert_eq!(summary.pending_expense_cents, 1_000);
        assert_eq!(summary.balance_cents, 7_000);
        assert_eq!(summary.projected_balance_cents, 11_000);
        assert_eq!(
            summary.by_category,
            vec![
                CategoryTotal {
                    category: "Ferramentas".to_string(),
                    revenue_cents: 0,
                    expense_cents: 1_000
                },
                CategoryTotal {
                    category: UNCATEGORIZED.to_string(),
                    revenue_cents: 5_000,
                    expense_cents: 0
                },
                CategoryTotal {
                    category: "Social".to_string(),
                    revenue_cents: 10_000,
                    expense_cents: 3_000
                },
            ]
        );
    }

    #[test]
    fn empty_period() {
        assert_eq!(summarize(&[], &[]), FinanceSummary::default());
    }
}
