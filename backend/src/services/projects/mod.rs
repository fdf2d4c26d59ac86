//! Projects and their Kanban board.

mod board;
mod create;
mod delete;
mod get;
mod list;
mod update;

use crate::db::clients;
use crate::error::{ApiError, ApiResult};
use crate::services::auth::required;
use crate::services::clients::non_blank;
use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;
use common::model::project::Project;
use common::requests::ProjectRequest;
use rusqlite::Connection;

const API_PATH: &str = "/projects";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/{id}", get().to(get::process))
        .route("/{id}", put().to(update::process))
        .route("/{id}", delete().to(delete::process))
        .route("/{id}/board", get().to(board::process))
}

/// Copies provided fields onto `project`. A client id must belong to the
/// same agency; an empty one detaches the client.
fn apply(conn: &Connection, project: &mut Project, req: ProjectRequest) -> ApiResult<()> {
    if let Some(client_id) = req.client_id {
        project.client_id = match non_blank(client_id) {
            Some(id) => Some(clients::find(conn, &project.agency_id, &id)?.id),
            None => None,
        };
    }
    if let Some(name) = req.name {
        project.name = required(&name, "name")?;
    }
    if let Some(description) = req.description {
        project.description = non_blank(description);
    }
    if let Some(status) = req.status {
        project.status = status;
    }
    if let Some(budget) = req.budget_cents {
        if budget < 0 {
            return Err(ApiError::validation("budgetCents cannot be negative"));
        }
        project.budget_cents = Some(budget);
    }
    if req.start_date.is_some() {
        project.start_date = req.start_date;
    }
    if req.due_date.is_some() {
        project.due_date = req.due_date;
    }
    if let (Some(start), Some(due)) = (project.start_date, project.due_date) {
        if due < start {
            return Err(ApiError::validation("dueDate cannot be before startDate"));
        }
    }
    Ok(())
}
