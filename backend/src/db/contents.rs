use crate::db::text_enum;
use crate::error::ApiResult;
use common::model::content::{ContentKind, GeneratedContent};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

fn from_row(row: &Row<'_>) -> rusqlite::Result<GeneratedContent> {
    let input: String = row.get(4)?;
    Ok(GeneratedContent {
        id: row.get(0)?,
        agency_id: row.get(1)?,
        user_id: row.get(2)?,
        kind: text_enum(row, 3)?,
        input: serde_json::from_str(&input)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?,
        output: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub fn insert(conn: &Connection, content: &GeneratedContent) -> ApiResult<()> {
    conn.execute(
        "INSERT INTO generated_contents (id, agency_id, user_id, kind, input, output, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            content.id,
            content.agency_id,
            content.user_id,
            content.kind.as_str(),
            content.input.to_string(),
            content.output,
            content.created_at
        ],
    )?;
    Ok(())
}

/// Newest first.
pub fn list(
    conn: &Connection,
    agency_id: &str,
    kind: Option<ContentKind>,
    limit: u32,
) -> ApiResult<Vec<GeneratedContent>> {
    let mut stmt = conn.prepare(
        "SELECT id, agency_id, user_id, kind, input, output, created_at
         FROM generated_contents
         WHERE agency_id = ?1 AND (?2 IS NULL OR kind = ?2)
         ORDER BY created_at DESC
         LIMIT ?3",
    )?;
    let rows = stmt
        .query_map(params![agency_id, kind.map(|k| k.as_str()), limit], from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
