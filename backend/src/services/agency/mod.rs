//! The caller's agency and its members.

mod create_member;
mod delete_member;
mod get;
mod list_members;
mod update;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/agency";

/// - `GET /agency`, `PUT /agency` (ADMIN+)
/// - `GET /agency/members`, `POST /agency/members` (ADMIN+)
/// - `DELETE /agency/members/{id}` (OWNER)
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(get::process))
        .route("", put().to(update::process))
        .route("/members", get().to(list_members::process))
        .route("/members", post().to(create_member::process))
        .route("/members/{id}", delete().to(delete_member::process))
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
    async fn role_guards_on_members() {
        let ctx = testing::default_context();
        let owner = testing::seed(&ctx.state, "Agência Norte", Role::Owner);
        let member = {
            let conn = ctx.state.db.lock().unwrap();
            testing::seed_member(&conn, &owner.agency_id, Role::Member)
        };
        let app = test::init_service(
            App::new()
                .app_data(ctx.state.clone())
                .configure(|cfg| configure(cfg, 1 << 20)),
        )
        .await;

        let new_member = json!({
            "name": "Bia",
            "email": "bia@norte.com",
            "password": "senha-forte",
        });

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/agency/members")
                .insert_header(testing::bearer(&member))
                .set_json(&new_member)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/agency/members")
                .insert_header(testing::bearer(&owner))
                .set_json(&new_member)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["role"], "MEMBER");

        let members: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/agency/members")
                .insert_header(testing::bearer(&member))
                .to_request(),
        )
        .await;
        assert_eq!(members.as_array().unwrap().len(), 3);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/agency/members/{}", owner.user_id))
                .insert_header(testing::bearer(&owner))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/agency/members/{}", created["id"].as_str().unwrap()))
                .insert_header(testing::bearer(&owner))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn admin_cannot_create_admins() {
        let ctx = testing::default_context();
        let owner = testing::seed(&ctx.state, "Agência Sul", Role::Owner);
        let admin = {
            let conn = ctx.state.db.lock().unwrap();
            testing::seed_member(&conn, &owner.agency_id, Role::Admin)
        };
        let app = test::init_service(
            App::new()
                .app_data(ctx.state.clone())
                .configure(|cfg| configure(cfg, 1 << 20)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/agency/members")
                .insert_header(testing::bearer(&admin))
                .set_json(json!({
                    "name": "Caio",
                    "email": "caio@sul.com",
                    "password": "senha-forte",
                    "role": "ADMIN"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/agency")
                .insert_header(testing::bearer(&admin))
                .set_json(json!({ "name": "Agência Sul Digital", "plan": "PRO" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let agency: Value = test::read_body_json(resp).await;
        assert_eq!(agency["slug"], "agencia-sul-digital");
        assert_eq!(agency["plan"], "PRO");
    }
}
