use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::services::auth::required;
use crate::services::copywriting::{generate, prompts};
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::model::content::ContentKind;
use common::requests::InstagramRequest;

const MAX_HASHTAGS: u8 = 30;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<InstagramRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    required(&req.topic, "topic")?;
    if req.hashtags.is_some_and(|n| n > MAX_HASHTAGS) {
        return Err(ApiError::Validation(format!(
            "hashtags must be between 0 and {}",
            MAX_HASHTAGS
        )));
    }
    let copy = generate(&ctx, &state, ContentKind::Instagram, &req, prompts::instagram(&req)).await?;
    Ok(HttpResponse::Ok().json(copy))
}
