use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::services::auth::required;
use crate::services::copywriting::{generate, prompts};
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::model::content::ContentKind;
use common::requests::BlogRequest;
use std::ops::RangeInclusive;

const WORD_COUNT: RangeInclusive<u32> = 300..=3000;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<BlogRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    required(&req.topic, "topic")?;
    if let Some(words) = req.word_count {
        if !WORD_COUNT.contains(&words) {
            return Err(ApiError::Validation(format!(
                "wordCount must be between {} and {}",
                WORD_COUNT.start(),
                WORD_COUNT.end()
            )));
        }
    }
    let copy = generate(&ctx, &state, ContentKind::Blog, &req, prompts::blog(&req)).await?;
    Ok(HttpResponse::Ok().json(copy))
}
