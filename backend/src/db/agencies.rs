//! Agencies, their users and login sessions.

use crate::db::{new_id, not_found_as, text_enum};
use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, Utc};
use common::model::agency::{Agency, Plan, Role, User};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// A user row including the credential, which never leaves the backend.
pub struct UserWithHash {
    pub user: User,
    pub password_hash: String,
}

fn agency_from_row(row: &Row<'_>) -> rusqlite::Result<Agency> {
    Ok(Agency {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        plan: text_enum(row, 3)?,
        created_at: row.get(4)?,
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        agency_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        role: text_enum(row, 4)?,
        created_at: row.get(5)?,
    })
}

const USER_COLUMNS: &str = "id, agency_id, name, email, role, created_at";

/// Lowercase ASCII slug: letters and digits kept, everything else collapsed to `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        let ch = fold_accent(ch);
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        other => other,
    }
}

pub fn insert_agency(conn: &Connection, name: &str, plan: Plan) -> ApiResult<Agency> {
    let agency = Agency {
        id: new_id(),
        name: name.to_string(),
        slug: slugify(name),
        plan,
        created_at: Utc::now(),
    };
    conn.execute(
        "INSERT INTO agencies (id, name, slug, plan, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![agency.id, agency.name, agency.slug, agency.plan.as_str(), agency.created_at],
    )?;
    Ok(agency)
}

pub fn find_agency(conn: &Connection, agency_id: &str) -> ApiResult<Agency> {
    conn.query_row(
        "SELECT id, name, slug, plan, created_at FROM agencies WHERE id = ?1",
        params![agency_id],
        agency_from_row,
    )
    .map_err(not_found_as("agency"))
}

pub fn update_agency(conn: &Connection, agency: &Agency) -> ApiResult<()> {
    conn.execute(
        "UPDATE agencies SET name = ?1, slug = ?2, plan = ?3 WHERE id = ?4",
        params![agency.name, agency.slug, agency.plan.as_str(), agency.id],
    )?;
    Ok(())
}

pub fn insert_user(
    conn: &Connection,
    agency_id: &str,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> ApiResult<User> {
    let user = User {
        id: new_id(),
        agency_id: agency_id.to_string(),
        name: name.to_string(),
        email: email.to_lowercase(),
        role,
        created_at: Utc::now(),
    };
    let result = conn.execute(
        "INSERT INTO users (id, agency_id, name, email, password_hash, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.id,
            user.agency_id,
            user.name,
            user.email,
            password_hash,
            user.role.as_str(),
            user.created_at
        ],
    );
    match result {
        Ok(_) => Ok(user),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(ApiError::Conflict("email already registered".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> ApiResult<Option<UserWithHash>> {
    let sql = format!("SELECT {}, password_hash FROM users WHERE email = ?1", USER_COLUMNS);
    let found = conn
        .query_row(&sql, params![email.to_lowercase()], |row| {
            Ok(UserWithHash {
                user: user_from_row(row)?,
                password_hash: row.get(6)?,
            })
        })
        .optional()?;
    Ok(found)
}

pub fn find_user(conn: &Connection, agency_id: &str, user_id: &str) -> ApiResult<User> {
    let sql = format!("SELECT {} FROM users WHERE id = ?1 AND agency_id = ?2", USER_COLUMNS);
    conn.query_row(&sql, params![user_id, agency_id], user_from_row)
        .map_err(not_found_as("user"))
}

pub fn list_users(conn: &Connection, agency_id: &str) -> ApiResult<Vec<User>> {
    let sql = format!(
        "SELECT {} FROM users WHERE agency_id = ?1 ORDER BY created_at",
        USER_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let users = stmt
        .query_map(params![agency_id], user_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

pub fn delete_user(conn: &Connection, agency_id: &str, user_id: &str) -> ApiResult<()> {
    let deleted = conn.execute(
        "DELETE FROM users WHERE id = ?1 AND agency_id = ?2",
        params![user_id, agency_id],
    )?;
    if deleted == 0 {
        return Err(ApiError::not_found("user"));
    }
    Ok(())
}

pub fn insert_session(
    conn: &Connection,
    token_hash: &str,
    user_id: &str,
    expires_at: DateTime<Utc>,
) -> ApiResult<()> {
    conn.execute(
        "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (?1, ?2, ?3)",
        params![token_hash, user_id, expires_at],
    )?;
    Ok(())
}

/// Resolves an unexpired session to its user.
pub fn find_session_user(
    conn: &Connection,
    token_hash: &str,
    now: DateTime<Utc>,
) -> ApiResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT u.id, u.agency_id, u.name, u.email, u.role, u.created_at
             FROM sessions s JOIN users u ON u.id = s.user_id
             WHERE s.token_hash = ?1 AND s.expires_at > ?2",
            params![token_hash, now],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn delete_session(conn: &Connection, token_hash: &str) -> ApiResult<()> {
    conn.execute("DELETE FROM sessions WHERE token_hash = ?1", params![token_hash])?;
    Ok(())
}

pub fn purge_expired_sessions(conn: &Connection, now: DateTime<Utc>) -> ApiResult<usize> {
    Ok(conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?)
}
