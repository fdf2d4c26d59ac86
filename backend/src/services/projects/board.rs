use crate::app::AppState;
use crate::db::{projects, tasks};
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::model::project::{Board, BoardColumn};
use common::model::task::{Task, TaskStatus};

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    let project = projects::find(&conn, &ctx.agency_id, &id)?;
    let cards = tasks::list_for_project(&conn, &ctx.agency_id, &project.id)?;
    Ok(HttpResponse::Ok().json(build_board(project.id, cards)))
}

/// All four columns in board order, each sorted by position.
fn build_board(project_id: String, cards: Vec<Task>) -> Board {
    let mut columns: Vec<BoardColumn> = TaskStatus::ALL
        .iter()
        .map(|status| BoardColumn {
            status: *status,
            tasks: Vec::new(),
        })
        .collect();
    for card in cards {
        if let Some(column) = columns.iter_mut().find(|c| c.status == card.status) {
            column.tasks.push(card);
        }
    }
    for column in &mut columns {
        column.tasks.sort_by_key(|t| t.position);
    }
    Board {
        project_id,
        columns,
    }
}
