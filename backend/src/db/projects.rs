use crate::db::{not_found_as, text_enum};
use crate::error::{ApiError, ApiResult};
use common::model::project::Project;
use common::requests::ProjectQuery;
use rusqlite::{params, params_from_iter, Connection, Row, ToSql};

const COLUMNS: &str = "id, agency_id, client_id, name, description, status, budget_cents, \
                       start_date, due_date, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        agency_id: row.get(1)?,
        client_id: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        status: text_enum(row, 5)?,
        budget_cents: row.get(6)?,
        start_date: row.get(7)?,
        due_date: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

pub fn insert(conn: &Connection, project: &Project) -> ApiResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO projects ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            COLUMNS
        ),
        params![
            project.id,
            project.agency_id,
            project.client_id,
            project.name,
            project.description,
            project.status.as_str(),
            project.budget_cents,
            project.start_date,
            project.due_date,
            project.created_at,
            project.updated_at
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, agency_id: &str, id: &str) -> ApiResult<Project> {
    conn.query_row(
        &format!("SELECT {} FROM projects WHERE id = ?1 AND agency_id = ?2", COLUMNS),
        params![id, agency_id],
        from_row,
    )
    .map_err(not_found_as("project"))
}

pub fn list(conn: &Connection, agency_id: &str, query: &ProjectQuery) -> ApiResult<Vec<Project>> {
    let mut sql = format!("SELECT {} FROM projects WHERE agency_id = ?", COLUMNS);
    let mut args: Vec<Box<dyn ToSql>> = vec![Box::new(agency_id.to_string())];

    if let Some(client_id) = &query.client_id {
        sql.push_str(" AND client_id = ?");
        args.push(Box::new(client_id.clone()));
    }
    if let Some(status) = query.status {
        sql.push_str(" AND status = ?");
        args.push(Box::new(status.as_str()));
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let projects = stmt
        .query_map(params_from_iter(args.iter()), from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

pub fn update(conn: &Connection, project: &Project) -> ApiResult<()> {
    let updated = conn.execute(
        "UPDATE projects SET client_id = ?1, name = ?2, description = ?3, status = ?4,
                budget_cents = ?5, start_date = ?6, due_date = ?7, updated_at = ?8
         WHERE id = ?9 AND agency_id = ?10",
        params![
            project.client_id,
            project.name,
            project.description,
            project.status.as_str(),
            project.budget_cents,
            project.start_date,
            project.due_date,
            project.updated_at,
            project.id,
            project.agency_id
        ],
    )?;
    if updated == 0 {
        return Err(ApiError::not_found("project"));
    }
    Ok(())
}

/// Tasks of the project go with it (ON DELETE CASCADE).
pub fn delete(conn: &Connection, agency_id: &str, id: &str) -> ApiResult<()> {
    let deleted = conn.execute(
        "DELETE FROM projects WHERE id = ?1 AND agency_id = ?2",
        params![id, agency_id],
    )?;
    if deleted == 0 {
        return Err(ApiError::not_found("project"));
    }
    Ok(())
}
