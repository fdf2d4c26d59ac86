//! Client records of the caller's agency.

mod create;
mod delete;
mod get;
mod list;
mod update;

use crate::error::ApiResult;
use crate::services::auth::required;
use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;
use common::model::client::Client;
use common::requests::ClientRequest;

const API_PATH: &str = "/clients";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/{id}", get().to(get::process))
        .route("/{id}", put().to(update::process))
        .route("/{id}", delete().to(delete::process))
}

/// Copies the provided fields onto `client`. Blank optional strings clear.
fn apply(client: &mut Client, req: ClientRequest) -> ApiResult<()> {
    if let Some(name) = req.name {
        client.name = required(&name, "name")?;
    }
    if let Some(email) = req.email {
        client.email = non_blank(email);
    }
    if let Some(phone) = req.phone {
        client.phone = non_blank(phone);
    }
    if let Some(company) = req.company {
        client.company = non_blank(company);
    }
    if let Some(notes) = req.notes {
        client.notes = non_blank(notes);
    }
    if let Some(status) = req.status {
        client.status = status;
    }
    Ok(())
}

pub(crate) fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
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
    async fn crud_is_tenant_scoped() {
        let ctx = testing::default_context();
        let alice = testing::seed(&ctx.state, "Alfa", Role::Member);
        let bob = testing::seed(&ctx.state, "Beta", Role::Member);
        let app = test::init_service(
            App::new()
                .app_data(ctx.state.clone())
                .configure(|cfg| configure(cfg, 1 << 20)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/clients")
                .insert_header(testing::bearer(&alice))
                .set_json(json!({ "name": "Padaria Pão Quente", "email": "contato@pao.com" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let client: Value = test::read_body_json(resp).await;
        assert_eq!(client["status"], "LEAD");
        let uri = format!("/clients/{}", client["id"].as_str().unwrap());

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&uri)
                .insert_header(testing::bearer(&bob))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let updated: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header(testing::bearer(&alice))
                .set_json(json!({ "status": "ACTIVE", "phone": "  " }))
                .to_request(),
        )
        .await;
        assert_eq!(updated["status"], "ACTIVE");
        assert_eq!(updated["name"], "Padaria Pão Quente");
        assert!(updated["phone"].is_null());

        let found: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/clients?status=ACTIVE&search=p%C3%A3o")
                .insert_header(testing::bearer(&alice))
                .to_request(),
        )
        .await;
        assert_eq!(found.as_array().unwrap().len(), 1);

        let none: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/clients")
                .insert_header(testing::bearer(&bob))
                .to_request(),
        )
        .await;
        assert!(none.as_array().unwrap().is_empty());

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&uri)
                .insert_header(testing::bearer(&bob))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&uri)
                .insert_header(testing::bearer(&alice))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn requires_authentication() {
        let ctx = testing::default_context();
        let app = test::init_service(
            App::new()
                .app_data(ctx.state.clone())
                .configure(|cfg| configure(cfg, 1 << 20)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/clients").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "missing bearer token");
    }
}
