//! Kanban cards.
//!
//! Cards are created at the end of their column. Column and position only
//! change through `PATCH /tasks/{id}/move`, which keeps every column's
//! positions contiguous from zero.

mod create;
mod delete;
mod get;
mod list;
mod move_card;
mod update;

use crate::db::agencies;
use crate::error::ApiResult;
use crate::services::auth::required;
use crate::services::clients::non_blank;
use actix_web::web::{delete, get, patch, post, put, scope};
use actix_web::Scope;
use common::model::task::Task;
use common::requests::TaskRequest;
use rusqlite::Connection;

const API_PATH: &str = "/tasks";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/{id}", get().to(get::process))
        .route("/{id}", put().to(update::process))
        .route("/{id}", delete().to(delete::process))
        .route("/{id}/move", patch().to(move_card::process))
}

/// Editable fields only; `project_id`, `status` and position are ignored.
fn apply(conn: &Connection, task: &mut Task, req: TaskRequest) -> ApiResult<()> {
    if let Some(title) = req.title {
        task.title = required(&title, "title")?;
    }
    if let Some(description) = req.description {
        task.description = non_blank(description);
    }
    if let Some(priority) = req.priority {
        task.priority = priority;
    }
    if let Some(assignee_id) = req.assignee_id {
        task.assignee_id = match non_blank(assignee_id) {
            Some(id) => Some(agencies::find_user(conn, &task.agency_id, &id)?.id),
            None => None,
        };
    }
    if req.due_date.is_some() {
        task.due_date = req.due_date;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{configure, testing};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::model::agency::Role;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn create_move_and_board() {
        let ctx = testing::default_context();
        let user = testing::seed(&ctx.state, "Alfa", Role::Member);
        let app = test::init_service(
            App::new()
                .app_data(ctx.state.clone())
                .configure(|cfg| configure(cfg, 1 << 20)),
        )
        .await;

        let project: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/projects")
                .insert_header(testing::bearer(&user))
                .set_json(json!({ "name": "Campanha" }))
                .to_request(),
        )
        .await;
        let project_id = project["id"].as_str().unwrap();

        let mut ids = Vec::new();
        for title in ["Briefing", "Roteiro", "Arte"] {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/tasks")
                    .insert_header(testing::bearer(&user))
                    .set_json(json!({
                        "projectId": project_id,
                        "title": title,
                        "assigneeId": user.user_id
                    }))
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let task: Value = test::read_body_json(resp).await;
            assert_eq!(task["position"], ids.len());
            ids.push(task["id"].as_str().unwrap().to_string());
        }

        let moved: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/tasks/{}/move", ids[0]))
                .insert_header(testing::bearer(&user))
                .set_json(json!({ "status": "IN_PROGRESS", "position": 42 }))
                .to_request(),
        )
        .await;
        assert_eq!(moved["status"], "IN_PROGRESS");
        assert_eq!(moved["position"], 0);

        let board: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/projects/{}/board", project_id))
                .insert_header(testing::bearer(&user))
                .to_request(),
        )
        .await;
        let todo: Vec<(String, i64)> = board["columns"][0]["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| (t["title"].as_str().unwrap().to_string(), t["position"].as_i64().unwrap()))
            .collect();
        assert_eq!(
            todo,
            vec![("Roteiro".to_string(), 0), ("Arte".to_string(), 1)]
        );
        assert_eq!(board["columns"][1]["tasks"][0]["title"], "Briefing");
    }

    #[actix_web::test]
    async fn rejects_foreign_project_and_assignee() {
        let ctx = testing::default_context();
        let alice = testing::seed(&ctx.state, "Alfa", Role::Member);
        let bob = testing::seed(&ctx.state, "Beta", Role::Member);
        let app = test::init_service(
            App::new()
                .app_data(ctx.state.clone())
                .configure(|cfg| configure(cfg, 1 << 20)),
        )
        .await;

        let project: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/projects")
                .insert_header(testing::bearer(&alice))
                .set_json(json!({ "name": "Campanha" }))
                .to_request(),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/tasks")
                .insert_header(testing::bearer(&bob))
                .set_json(json!({ "projectId": project["id"], "title": "Intrusa" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/tasks")
                .insert_header(testing::bearer(&alice))
                .set_json(json!({
                    "projectId": project["id"],
                    "title": "Post",
                    "assigneeId": bob.user_id
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/tasks")
                .insert_header(testing::bearer(&alice))
                .set_json(json!({ "projectId": project["id"] }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
