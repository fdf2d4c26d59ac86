//! Ebook rows.
//!
//! Pipeline writes go through conditional updates. A stage is only queued
//! while the row still has the status and job id the caller observed, and a
//! stage result only lands while its job is still the one in `metadata.jobId`.

use crate::db::{not_found_as, text_enum};
use crate::error::{ApiError, ApiResult};
use chrono::Utc;
use common::model::ebook::{Ebook, EbookMetadata, EbookStatus};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

const COLUMNS: &str =
    "id, agency_id, title, description, content, status, pdf_url, metadata, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Ebook> {
    let metadata: Option<String> = row.get(7)?;
    let metadata = metadata
        .map(|raw| serde_json::from_str::<EbookMetadata>(&raw))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;
    Ok(Ebook {
        id: row.get(0)?,
        agency_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        content: row.get(4)?,
        status: text_enum(row, 5)?,
        pdf_url: row.get(6)?,
        metadata,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn expect_one(changed: usize) -> ApiResult<()> {
    if changed == 0 {
        return Err(ApiError::not_found("ebook"));
    }
    Ok(())
}

pub fn insert(conn: &Connection, ebook: &Ebook) -> ApiResult<()> {
    let metadata = ebook.metadata.as_ref().map(serde_json::to_string).transpose()?;
    conn.execute(
        &format!(
            "INSERT INTO ebooks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            COLUMNS
        ),
        params![
            ebook.id,
            ebook.agency_id,
            ebook.title,
            ebook.description,
            ebook.content,
            ebook.status.as_str(),
            ebook.pdf_url,
            metadata,
            ebook.created_at,
            ebook.updated_at
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, agency_id: &str, id: &str) -> ApiResult<Ebook> {
    conn.query_row(
        &format!("SELECT {} FROM ebooks WHERE id = ?1 AND agency_id = ?2", COLUMNS),
        params![id, agency_id],
        from_row,
    )
    .map_err(not_found_as("ebook"))
}

pub fn list(conn: &Connection, agency_id: &str) -> ApiResult<Vec<Ebook>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM ebooks WHERE agency_id = ?1 ORDER BY created_at DESC",
        COLUMNS
    ))?;
    let rows = stmt
        .query_map(params![agency_id], from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// User edits: title and outline.
pub fn update_details(conn: &Connection, ebook: &Ebook) -> ApiResult<()> {
    let changed = conn.execute(
        "UPDATE ebooks SET title = ?1, description = ?2, updated_at = ?3
         WHERE id = ?4 AND agency_id = ?5",
        params![ebook.title, ebook.description, Utc::now(), ebook.id, ebook.agency_id],
    )?;
    expect_one(changed)
}

/// Returns the removed row so the caller can clean up its PDF.
pub fn delete(conn: &Connection, agency_id: &str, id: &str) -> ApiResult<Ebook> {
    let ebook = find(conn, agency_id, id)?;
    let changed = conn.execute(
        "DELETE FROM ebooks WHERE id = ?1 AND agency_id = ?2",
        params![id, agency_id],
    )?;
    expect_one(changed)?;
    Ok(ebook)
}

/// Compare-and-set on status. Fails with Conflict when the row moved on.
pub fn transition(
    conn: &Connection,
    agency_id: &str,
    id: &str,
    from: EbookStatus,
    to: EbookStatus,
) -> ApiResult<()> {
    let changed = conn.execute(
        "UPDATE ebooks SET status = ?1, updated_at = ?2
         WHERE id = ?3 AND agency_id = ?4 AND status = ?5",
        params![to.as_str(), Utc::now(), id, agency_id, from.as_str()],
    )?;
    if changed == 0 {
        find(conn, agency_id, id)?;
        return Err(ApiError::Conflict(format!(
            "ebook is no longer {}, reload and try again",
            from
        )));
    }
    Ok(())
}

/// `metadata.jobId` of the row, compared in SQL.
const CURRENT_JOB: &str = "json_extract(metadata, '$.jobId')";

/// Records the queued job and advances the status in one conditional write.
///
/// The row must still carry both the status and the job id the caller read,
/// so of two racing triggers only the first one is recorded.
pub fn record_queued(
    conn: &Connection,
    agency_id: &str,
    id: &str,
    observed_status: EbookStatus,
    observed_job: Option<&str>,
    next: EbookStatus,
    metadata: &EbookMetadata,
) -> ApiResult<()> {
    let changed = conn.execute(
        &format!(
            "UPDATE ebooks SET status = ?1, metadata = ?2, updated_at = ?3
             WHERE id = ?4 AND agency_id = ?5 AND status = ?6 AND {} IS ?7",
            CURRENT_JOB
        ),
        params![
            next.as_str(),
            serde_json::to_string(metadata)?,
            Utc::now(),
            id,
            agency_id,
            observed_status.as_str(),
            observed_job
        ],
    )?;
    if changed == 0 {
        find(conn, agency_id, id)?;
        return Err(ApiError::Conflict(
            "ebook changed while the stage was being queued".to_string(),
        ));
    }
    Ok(())
}

/// Undoes `record_queued` when the queue refused the job.
pub fn unqueue(
    conn: &Connection,
    agency_id: &str,
    id: &str,
    job_id: &str,
    status: EbookStatus,
    previous: Option<&EbookMetadata>,
) -> ApiResult<()> {
    let previous = previous.map(serde_json::to_string).transpose()?;
    let changed = conn.execute(
        &format!(
            "UPDATE ebooks SET status = ?1, metadata = ?2, updated_at = ?3
             WHERE id = ?4 AND agency_id = ?5 AND {} = ?6",
            CURRENT_JOB
        ),
        params![status.as_str(), previous, Utc::now(), id, agency_id, job_id],
    )?;
    written_for_job(conn, agency_id, id, job_id, changed)
}

fn written_for_job(
    conn: &Connection,
    agency_id: &str,
    id: &str,
    job_id: &str,
    changed: usize,
) -> ApiResult<()> {
    if changed == 0 {
        find(conn, agency_id, id)?;
        return Err(ApiError::Conflict(format!(
            "job {} was superseded by a newer stage",
            job_id
        )));
    }
    Ok(())
}

/// Stage results land only while `job_id` is still the ebook's current job.
fn store_stage(
    conn: &Connection,
    agency_id: &str,
    id: &str,
    job_id: &str,
    column: &str,
    value: &str,
    status: EbookStatus,
) -> ApiResult<()> {
    let changed = conn.execute(
        &format!(
            "UPDATE ebooks SET {} = ?1, status = ?2, updated_at = ?3
             WHERE id = ?4 AND agency_id = ?5 AND {} = ?6",
            column, CURRENT_JOB
        ),
        params![value, status.as_str(), Utc::now(), id, agency_id, job_id],
    )?;
    written_for_job(conn, agency_id, id, job_id, changed)
}

pub fn store_description(
    conn: &Connection,
    agency_id: &str,
    id: &str,
    job_id: &str,
    description: &str,
) -> ApiResult<()> {
    store_stage(
        conn,
        agency_id,
        id,
        job_id,
        "description",
        description,
        EbookStatus::DescriptionGenerated,
    )
}

pub fn store_content(
    conn: &Connection,
    agency_id: &str,
    id: &str,
    job_id: &str,
    content: &str,
) -> ApiResult<()> {
    store_stage(conn, agency_id, id, job_id, "content", content, EbookStatus::ContentReady)
}

pub fn store_pdf(conn: &Connection, agency_id: &str, id: &str, job_id: &str, pdf_url: &str) -> ApiResult<()> {
    store_stage(conn, agency_id, id, job_id, "pdf_url", pdf_url, EbookStatus::Completed)
}

/// Only the status column is touched; generated fields stay as they were.
pub fn mark_error(conn: &Connection, agency_id: &str, id: &str, job_id: &str) -> ApiResult<()> {
    let changed = conn.execute(
        &format!(
            "UPDATE ebooks SET status = ?1, updated_at = ?2
             WHERE id = ?3 AND agency_id = ?4 AND {} = ?5",
            CURRENT_JOB
        ),
        params![EbookStatus::Error.as_str(), Utc::now(), id, agency_id, job_id],
    )?;
    written_for_job(conn, agency_id, id, job_id, changed)
}
