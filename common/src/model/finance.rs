use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    pub enum RevenueStatus {
        Pending => "PENDING",
        Received => "RECEIVED",
    }
}

text_enum! {
    pub enum ExpenseStatus {
        Pending => "PENDING",
        Paid => "PAID",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revenue {
    pub id: String,
    pub agency_id: String,
    pub client_id: Option<String>,
    pub description: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub category: Option<String>,
    pub status: RevenueStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub agency_id: String,
    pub description: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub category: Option<String>,
    pub status: ExpenseStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub revenue_cents: i64,
    pub expense_cents: i64,
}

/// Totals for a period. `balance_cents` only counts money that actually moved;
/// `projected_balance_cents` includes pending entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub revenue_cents: i64,
    pub received_cents: i64,
    pub pending_revenue_cents: i64,
    pub expense_cents: i64,
    pub paid_cents: i64,
    pub pending_expense_cents: i64,
    pub balance_cents: i64,
    pub projected_balance_cents: i64,
    pub by_category: Vec<CategoryTotal>,
}
