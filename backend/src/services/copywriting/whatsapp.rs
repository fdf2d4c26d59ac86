use crate::app::AppState;
use crate::error::ApiResult;
use crate::services::auth::required;
use crate::services::copywriting::{generate, prompts};
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::model::content::ContentKind;
use common::requests::WhatsappRequest;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<WhatsappRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    required(&req.product, "product")?;
    required(&req.objective, "objective")?;
    let copy = generate(&ctx, &state, ContentKind::Whatsapp, &req, prompts::whatsapp(&req)).await?;
    Ok(HttpResponse::Ok().json(copy))
}
