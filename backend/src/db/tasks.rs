//! Kanban cards.
//!
//! Invariant: inside each (project, status) column the positions are exactly
//! `0..n-1`. Insert appends, delete compacts, move shifts both columns.

use crate::db::{not_found_as, text_enum};
use crate::error::{ApiError, ApiResult};
use chrono::Utc;
use common::model::task::{Task, TaskStatus};
use common::requests::TaskQuery;
use rusqlite::{params, params_from_iter, Connection, Row, ToSql};

const COLUMNS: &str = "id, agency_id, project_id, title, description, status, priority, \
                       position, assignee_id, due_date, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        agency_id: row.get(1)?,
        project_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        status: text_enum(row, 5)?,
        priority: text_enum(row, 6)?,
        position: row.get(7)?,
        assignee_id: row.get(8)?,
        due_date: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn column_len(conn: &Connection, project_id: &str, status: TaskStatus) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM tasks WHERE project_id = ?1 AND status = ?2",
        params![project_id, status.as_str()],
        |row| row.get(0),
    )
}

/// Appends the task at the end of its column; `task.position` is overwritten.
pub fn insert(conn: &Connection, task: &mut Task) -> ApiResult<()> {
    task.position = column_len(conn, &task.project_id, task.status)?;
    conn.execute(
        &format!(
            "INSERT INTO tasks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            COLUMNS
        ),
        params![
            task.id,
            task.agency_id,
            task.project_id,
            task.title,
            task.description,
            task.status.as_str(),
            task.priority.as_str(),
            task.position,
            task.assignee_id,
            task.due_date,
            task.created_at,
            task.updated_at
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, agency_id: &str, id: &str) -> ApiResult<Task> {
    conn.query_row(
        &format!("SELECT {} FROM tasks WHERE id = ?1 AND agency_id = ?2", COLUMNS),
        params![id, agency_id],
        from_row,
    )
    .map_err(not_found_as("task"))
}

pub fn list(conn: &Connection, agency_id: &str, query: &TaskQuery) -> ApiResult<Vec<Task>> {
    let mut sql = format!("SELECT {} FROM tasks WHERE agency_id = ?", COLUMNS);
    let mut args: Vec<Box<dyn ToSql>> = vec![Box::new(agency_id.to_string())];

    if let Some(project_id) = &query.project_id {
        sql.push_str(" AND project_id = ?");
        args.push(Box::new(project_id.clone()));
    }
    if let Some(status) = query.status {
        sql.push_str(" AND status = ?");
        args.push(Box::new(status.as_str()));
    }
    sql.push_str(" ORDER BY project_id, status, position");

    let mut stmt = conn.prepare(&sql)?;
    let tasks = stmt
        .query_map(params_from_iter(args.iter()), from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// All cards of a project ordered by position. Grouping is left to the caller.
pub fn list_for_project(conn: &Connection, agency_id: &str, project_id: &str) -> ApiResult<Vec<Task>> {
    list(
        conn,
        agency_id,
        &TaskQuery {
            project_id: Some(project_id.to_string()),
            status: None,
        },
    )
}

/// Saves the editable fields. Column and position only change through `move_to`.
pub fn update(conn: &Connection, task: &Task) -> ApiResult<()> {
    let updated = conn.execute(
        "UPDATE tasks SET title = ?1, description = ?2, priority = ?3, assignee_id = ?4,
                due_date = ?5, updated_at = ?6
         WHERE id = ?7 AND agency_id = ?8",
        params![
            task.title,
            task.description,
            task.priority.as_str(),
            task.assignee_id,
            task.due_date,
            task.updated_at,
            task.id,
            task.agency_id
        ],
    )?;
    if updated == 0 {
        return Err(ApiError::not_found("task"));
    }
    Ok(())
}

pub fn delete(conn: &Connection, agency_id: &str, id: &str) -> ApiResult<()> {
    let task = find(conn, agency_id, id)?;
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM tasks WHERE id = ?1", params![task.id])?;
    tx.execute(
        "UPDATE tasks SET position = position - 1
         WHERE project_id = ?1 AND status = ?2 AND position > ?3",
        params![task.project_id, task.status.as_str(), task.position],
    )?;
    tx.commit()?;
    Ok(())
}

/// Moves a card to `status` at `position`, clamped to `[0, len]` of the target
/// column. Returns the card as stored afterwards.
pub fn move_to(
    conn: &Connection,
    agency_id: &str,
    id: &str,
    status: TaskStatus,
    position: i64,
) -> ApiResult<Task> {
    let task = find(conn, agency_id, id)?;
    let tx = conn.unchecked_transaction()?;

    // close the gap in the source column
    tx.execute(
        "UPDATE tasks SET position = position - 1
         WHERE project_id = ?1 AND status = ?2 AND position > ?3 AND id != ?4",
        params![task.project_id, task.status.as_str(), task.position, task.id],
    )?;

    let target_len: i64 = tx.query_row(
        "SELECT COUNT(*) FROM tasks WHERE project_id = ?1 AND status = ?2 AND id != ?3",
        params![task.project_id, status.as_str(), task.id],
        |row| row.get(0),
    )?;
    let position = position.clamp(0, target_len);

    tx.execute(
        "UPDATE tasks SET position = position + 1
         WHERE project_id = ?1 AND status = ?2 AND position >= ?3 AND id != ?4",
        params![task.project_id, status.as_str(), position, task.id],
    )?;
    tx.execute(
        "UPDATE tasks SET status = ?1, position = ?2, updated_at = ?3 WHERE id = ?4",
        params![status.as_str(), position, Utc::now(), task.id],
    )?;
    tx.commit()?;

    find(conn, agency_id, id)
}
