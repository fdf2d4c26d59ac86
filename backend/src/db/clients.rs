use crate::db::{not_found_as, text_enum};
use crate::error::{ApiError, ApiResult};
use common::model::client::Client;
use common::requests::ClientQuery;
use rusqlite::{params, params_from_iter, Connection, Row, ToSql};

const COLUMNS: &str =
    "id, agency_id, name, email, phone, company, notes, status, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        agency_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        company: row.get(5)?,
        notes: row.get(6)?,
        status: text_enum(row, 7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub fn insert(conn: &Connection, client: &Client) -> ApiResult<()> {
    conn.execute(
        &format!("INSERT INTO clients ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)", COLUMNS),
        params![
            client.id,
            client.agency_id,
            client.name,
            client.email,
            client.phone,
            client.company,
            client.notes,
            client.status.as_str(),
            client.created_at,
            client.updated_at
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, agency_id: &str, id: &str) -> ApiResult<Client> {
    conn.query_row(
        &format!("SELECT {} FROM clients WHERE id = ?1 AND agency_id = ?2", COLUMNS),
        params![id, agency_id],
        from_row,
    )
    .map_err(not_found_as("client"))
}

pub fn list(conn: &Connection, agency_id: &str, query: &ClientQuery) -> ApiResult<Vec<Client>> {
    let mut sql = format!("SELECT {} FROM clients WHERE agency_id = ?", COLUMNS);
    let mut args: Vec<Box<dyn ToSql>> = vec![Box::new(agency_id.to_string())];

    if let Some(status) = query.status {
        sql.push_str(" AND status = ?");
        args.push(Box::new(status.as_str()));
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        sql.push_str(" AND (name LIKE ? OR company LIKE ? OR email LIKE ?)");
        let pattern = format!("%{}%", search);
        for _ in 0..3 {
            args.push(Box::new(pattern.clone()));
        }
    }
    sql.push_str(" ORDER BY name COLLATE NOCASE");

    let mut stmt = conn.prepare(&sql)?;
    let clients = stmt
        .query_map(params_from_iter(args.iter()), from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(clients)
}

pub fn update(conn: &Connection, client: &Client) -> ApiResult<()> {
    let updated = conn.execute(
        "UPDATE clients SET name = ?1, email = ?2, phone = ?3, company = ?4, notes = ?5,
                status = ?6, updated_at = ?7
         WHERE id = ?8 AND agency_id = ?9",
        params![
            client.name,
            client.email,
            client.phone,
            client.company,
            client.notes,
            client.status.as_str(),
            client.updated_at,
            client.id,
            client.agency_id
        ],
    )?;
    if updated == 0 {
        return Err(ApiError::not_found("client"));
    }
    Ok(())
}

pub fn delete(conn: &Connection, agency_id: &str, id: &str) -> ApiResult<()> {
    let deleted = conn.execute(
        "DELETE FROM clients WHERE id = ?1 AND agency_id = ?2",
        params![id, agency_id],
    )?;
    if deleted == 0 {
        return Err(ApiError::not_found("client"));
    }
    Ok(())
}
