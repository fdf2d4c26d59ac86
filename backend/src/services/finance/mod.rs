//! Revenues, expenses and the period summary.

mod expenses;
mod revenues;
mod summary;

use crate::error::{ApiError, ApiResult};
use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;
use common::requests::PeriodQuery;

const API_PATH: &str = "/finance";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/revenues", get().to(revenues::list))
        .route("/revenues", post().to(revenues::create))
        .route("/revenues/{id}", put().to(revenues::update))
        .route("/revenues/{id}", delete().to(revenues::delete))
        .route("/expenses", get().to(expenses::list))
        .route("/expenses", post().to(expenses::create))
        .route("/expenses/{id}", put().to(expenses::update))
        .route("/expenses/{id}", delete().to(expenses::delete))
        .route("/summary", get().to(summary::process))
}

fn check_period(period: &PeriodQuery) -> ApiResult<()> {
    if let (Some(from), Some(to)) = (period.from, period.to) {
        if from > to {
            return Err(ApiError::validation("'from' must not be after 'to'"));
        }
    }
    Ok(())
}

fn check_amount(amount_cents: i64) -> ApiResult<i64> {
    if amount_cents <= 0 {
        return Err(ApiError::validation("amountCents must be greater than zero"));
    }
    Ok(amount_cents)
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
    async fn records_entries_and_summarizes() {
        let ctx = testing::default_context();
        let user = testing::seed(&ctx.state, "Alfa", Role::Admin);
        let app = test::init_service(
            App::new()
                .app_data(ctx.state.clone())
                .configure(|cfg| configure(cfg, 1 << 20)),
        )
        .await;

        let entries = [
            ("/finance/revenues", json!({ "description": "Gestão de tráfego", "amountCents": 300000, "date": "2026-05-10", "category": "Tráfego", "status": "RECEIVED" })),
            ("/finance/revenues", json!({ "description": "Site", "amountCents": 150000, "date": "2026-05-20" })),
            ("/finance/expenses", json!({ "description": "Anúncios", "amountCents": 50000, "date": "2026-05-11", "category": "Tráfego", "status": "PAID" })),
            ("/finance/revenues", json!({ "description": "Fora do período", "amountCents": 999, "date": "2026-07-01" })),
        ];
        for (uri, body) in entries {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(uri)
                    .insert_header(testing::bearer(&user))
                    .set_json(body)
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let summary: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/finance/summary?from=2026-05-01&to=2026-05-31")
                .insert_header(testing::bearer(&user))
                .to_request(),
        )
        .await;
        assert_eq!(summary["revenueCents"], 450000);
        assert_eq!(summary["receivedCents"], 300000);
        assert_eq!(summary["pendingRevenueCents"], 150000);
        assert_eq!(summary["paidCents"], 50000);
        assert_eq!(summary["balanceCents"], 250000);
        assert_eq!(summary["projectedBalanceCents"], 400000);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/finance/summary?from=2026-06-01&to=2026-05-01")
                .insert_header(testing::bearer(&user))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/finance/expenses")
                .insert_header(testing::bearer(&user))
                .set_json(json!({ "description": "Nada", "amountCents": 0, "date": "2026-05-01" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let listed: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/finance/revenues?from=2026-06-01")
                .insert_header(testing::bearer(&user))
                .to_request(),
        )
        .await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }
}
