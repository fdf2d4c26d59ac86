//! Revenues and expenses. Amounts are integer cents.

use crate::db::{not_found_as, text_enum};
use crate::error::{ApiError, ApiResult};
use common::model::finance::{Expense, Revenue};
use common::requests::PeriodQuery;
use rusqlite::{params, params_from_iter, Connection, Row, ToSql};

const REVENUE_COLUMNS: &str =
    "id, agency_id, client_id, description, amount_cents, date, category, status, created_at";
const EXPENSE_COLUMNS: &str =
    "id, agency_id, description, amount_cents, date, category, status, created_at";

fn revenue_from_row(row: &Row<'_>) -> rusqlite::Result<Revenue> {
    Ok(Revenue {
        id: row.get(0)?,
        agency_id: row.get(1)?,
        client_id: row.get(2)?,
        description: row.get(3)?,
        amount_cents: row.get(4)?,
        date: row.get(5)?,
        category: row.get(6)?,
        status: text_enum(row, 7)?,
        created_at: row.get(8)?,
    })
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        agency_id: row.get(1)?,
        description: row.get(2)?,
        amount_cents: row.get(3)?,
        date: row.get(4)?,
        category: row.get(5)?,
        status: text_enum(row, 6)?,
        created_at: row.get(7)?,
    })
}

/// Appends `AND date >= ? AND date <= ?` for the bounds that are set.
fn period_filter(sql: &mut String, args: &mut Vec<Box<dyn ToSql>>, period: &PeriodQuery) {
    if let Some(from) = period.from {
        sql.push_str(" AND date >= ?");
        args.push(Box::new(from));
    }
    if let Some(to) = period.to {
        sql.push_str(" AND date <= ?");
        args.push(Box::new(to));
    }
}

pub fn insert_revenue(conn: &Connection, revenue: &Revenue) -> ApiResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO revenues ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            REVENUE_COLUMNS
        ),
        params![
            revenue.id,
            revenue.agency_id,
            revenue.client_id,
            revenue.description,
            revenue.amount_cents,
            revenue.date,
            revenue.category,
            revenue.status.as_str(),
            revenue.created_at
        ],
    )?;
    Ok(())
}

pub fn find_revenue(conn: &Connection, agency_id: &str, id: &str) -> ApiResult<Revenue> {
    conn.query_row(
        &format!("SELECT {} FROM revenues WHERE id = ?1 AND agency_id = ?2", REVENUE_COLUMNS),
        params![id, agency_id],
        revenue_from_row,
    )
    .map_err(not_found_as("revenue"))
}

pub fn list_revenues(conn: &Connection, agency_id: &str, period: &PeriodQuery) -> ApiResult<Vec<Revenue>> {
    let mut sql = format!("SELECT {} FROM revenues WHERE agency_id = ?", REVENUE_COLUMNS);
    let mut args: Vec<Box<dyn ToSql>> = vec![Box::new(agency_id.to_string())];
    period_filter(&mut sql, &mut args, period);
    sql.push_str(" ORDER BY date DESC, created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(args.iter()), revenue_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn update_revenue(conn: &Connection, revenue: &Revenue) -> ApiResult<()> {
    let updated = conn.execute(
        "UPDATE revenues SET client_id = ?1, description = ?2, amount_cents = ?3, date = ?4,
                category = ?5, status = ?6
         WHERE id = ?7 AND agency_id = ?8",
        params![
            revenue.client_id,
            revenue.description,
            revenue.amount_cents,
            revenue.date,
            revenue.category,
            revenue.status.as_str(),
            revenue.id,
            revenue.agency_id
        ],
    )?;
    if updated == 0 {
        return Err(ApiError::not_found("revenue"));
    }
    Ok(())
}

pub fn delete_revenue(conn: &Connection, agency_id: &str, id: &str) -> ApiResult<()> {
    let deleted = conn.execute(
        "DELETE FROM revenues WHERE id = ?1 AND agency_id = ?2",
        params![id, agency_id],
    )?;
    if deleted == 0 {
        return Err(ApiError::not_found("revenue"));
    }
    Ok(())
}

pub fn insert_expense(conn: &Connection, expense: &Expense) -> ApiResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO expenses ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            EXPENSE_COLUMNS
        ),
        params![
            expense.id,
            expense.agency_id,
            expense.description,
            expense.amount_cents,
            expense.date,
            expense.category,
            expense.status.as_str(),
            expense.created_at
        ],
    )?;
    Ok(())
}

pub fn find_expense(conn: &Connection, agency_id: &str, id: &str) -> ApiResult<Expense> {
    conn.query_row(
        &format!("SELECT {} FROM expenses WHERE id = ?1 AND agency_id = ?2", EXPENSE_COLUMNS),
        params![id, agency_id],
        expense_from_row,
    )
    .map_err(not_found_as("expense"))
}

pub fn list_expenses(conn: &Connection, agency_id: &str, period: &PeriodQuery) -> ApiResult<Vec<Expense>> {
    let mut sql = format!("SELECT {} FROM expenses WHERE agency_id = ?", EXPENSE_COLUMNS);
    let mut args: Vec<Box<dyn ToSql>> = vec![Box::new(agency_id.to_string())];
    period_filter(&mut sql, &mut args, period);
    sql.push_str(" ORDER BY date DESC, created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(args.iter()), expense_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn update_expense(conn: &Connection, expense: &Expense) -> ApiResult<()> {
    let updated = conn.execute(
        "UPDATE expenses SET description = ?1, amount_cents = ?2, date = ?3, category = ?4,
                status = ?5
         WHERE id = ?6 AND agency_id = ?7",
        params![
            expense.description,
            expense.amount_cents,
            expense.date,
            expense.category,
            expense.status.as_str(),
            expense.id,
            expense.agency_id
        ],
    )?;
    if updated == 0 {
        return Err(ApiError::not_found("expense"));
    }
    Ok(())
}

pub fn delete_expense(conn: &Connection, agency_id: &str, id: &str) -> ApiResult<()> {
    let deleted = conn.execute(
        "DELETE FROM expenses WHERE id = ?1 AND agency_id = ?2",
        params![id, agency_id],
    )?;
    if deleted == 0 {
        return Err(ApiError::not_found("expense"));
    }
    Ok(())
}
