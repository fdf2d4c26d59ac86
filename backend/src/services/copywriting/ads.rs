use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::services::auth::required;
use crate::services::copywriting::{generate, prompts};
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::model::content::ContentKind;
use common::requests::AdRequest;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<AdRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    required(&req.product, "product")?;
    required(&req.objective, "objective")?;
    if req.variations.is_some_and(|n| !(1..=5).contains(&n)) {
        return Err(ApiError::validation("variations must be between 1 and 5"));
    }
    let copy = generate(&ctx, &state, ContentKind::Ad, &req, prompts::ad(&req)).await?;
    Ok(HttpResponse::Ok().json(copy))
}
