//! Marketing copy generators backed by the chat-completion API.
//!
//! Every generation is rate limited per agency and stored as history.

mod ads;
mod blog;
mod history;
mod instagram;
pub(crate) mod prompts;
mod whatsapp;

use crate::app::AppState;
use crate::db::{contents, new_id};
use crate::error::{ApiError, ApiResult};
use crate::llm::ChatRequest;
use crate::rate_limit::enforce;
use crate::tenant::TenantContext;
use actix_web::web::{get, post, scope};
use actix_web::Scope;
use chrono::Utc;
use common::model::content::{ContentKind, GeneratedContent, GeneratedCopy};
use log::info;
use serde::Serialize;

const API_PATH: &str = "/ai";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/instagram", post().to(instagram::process))
        .route("/blog", post().to(blog::process))
        .route("/whatsapp", post().to(whatsapp::process))
        .route("/ads", post().to(ads::process))
        .route("/history", get().to(history::process))
}

/// Runs one generation and records it.
async fn generate<I: Serialize>(
    ctx: &TenantContext,
    state: &AppState,
    kind: ContentKind,
    input: &I,
    request: ChatRequest,
) -> ApiResult<GeneratedCopy> {
    enforce(state.limiters.ai.as_ref(), &ctx.agency_id)?;

    let output = state.llm.complete(request).await?;
    let record = GeneratedContent {
        id: new_id(),
        agency_id: ctx.agency_id.clone(),
        user_id: ctx.user_id.clone(),
        kind,
        input: serde_json::to_value(input)
            .map_err(|e| ApiError::Internal(format!("failed to record input: {}", e)))?,
        output: output.trim().to_string(),
        created_at: Utc::now(),
    };
    {
        let conn = state.db.lock()?;
        contents::insert(&conn, &record)?;
    }
    info!(
        "generated {} copy {} for agency {} ({} chars)",
        kind,
        record.id,
        ctx.agency_id,
        record.output.len()
    );

    Ok(GeneratedCopy {
        id: record.id,
        kind,
        content: record.output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{configure, testing};
    use crate::llm::fake::ScriptedLlm;
    use crate::pdf::fake::RecordingRenderer;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::model::agency::Role;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn generates_and_records_history() {
        let ctx = testing::context(
            ScriptedLlm::default()
                .reply("  Legenda pronta #cafe  ")
                .reply("1. Anúncio A\n2. Anúncio B"),
            RecordingRenderer::default(),
        );
        let user = testing::seed(&ctx.state, "Alfa", Role::Member);
        let other = testing::seed(&ctx.state, "Beta", Role::Member);
        let app = test::init_service(
            App::new()
                .app_data(ctx.state.clone())
                .configure(|cfg| configure(cfg, 1 << 20)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/ai/instagram")
                .insert_header(testing::bearer(&user))
                .set_json(json!({ "topic": "Café especial", "hashtags": 5 }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let copy: Value = test::read_body_json(resp).await;
        assert_eq!(copy["kind"], "INSTAGRAM");
        assert_eq!(copy["content"], "Legenda pronta #cafe");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/ai/ads")
                .insert_header(testing::bearer(&user))
                .set_json(json!({
                    "product": "Curso",
                    "platform": "LINKEDIN",
                    "objective": "vendas",
                    "variations": 2
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let history: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/ai/history?kind=INSTAGRAM")
                .insert_header(testing::bearer(&user))
                .to_request(),
        )
        .await;
        let items = history.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["input"]["topic"], "Café especial");

        let history: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/ai/history")
                .insert_header(testing::bearer(&other))
                .to_request(),
        )
        .await;
        assert!(history.as_array().unwrap().is_empty());

        let requests = ctx.llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].user.contains("exatamente 5 hashtags"));
    }

    #[actix_web::test]
    async fn validates_ranges_and_surfaces_llm_errors() {
        let ctx = testing::context(
            ScriptedLlm::default().fail("model overloaded"),
            RecordingRenderer::default(),
        );
        let user = testing::seed(&ctx.state, "Alfa", Role::Member);
        let app = test::init_service(
            App::new()
                .app_data(ctx.state.clone())
                .configure(|cfg| configure(cfg, 1 << 20)),
        )
        .await;

        for (uri, body) in [
            ("/ai/instagram", json!({ "topic": "x", "hashtags": 31 })),
            ("/ai/blog", json!({ "topic": "x", "wordCount": 100 })),
            ("/ai/ads", json!({ "product": "x", "platform": "GOOGLE", "objective": "y", "variations": 9 })),
            ("/ai/whatsapp", json!({ "product": " ", "objective": "y" })),
        ] {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(uri)
                    .insert_header(testing::bearer(&user))
                    .set_json(body)
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/ai/whatsapp")
                .insert_header(testing::bearer(&user))
                .set_json(json!({ "product": "Plano", "objective": "fechar" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
