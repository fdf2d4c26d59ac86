use crate::app::AppState;
use crate::db::ebooks;
use crate::error::{ApiError, ApiResult};
use crate::services::auth::required;
use crate::services::clients::non_blank;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::ebook::EbookOutline;
use common::requests::UpdateEbookRequest;

/// Lets the user edit the generated outline before approving it.
pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<UpdateEbookRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let conn = state.db.lock()?;
    let mut ebook = ebooks::find(&conn, &ctx.agency_id, &id)?;

    if let Some(title) = req.title {
        ebook.title = required(&title, "title")?;
    }
    if let Some(description) = req.description {
        let description = non_blank(description);
        if let Some(raw) = &description {
            serde_json::from_str::<EbookOutline>(raw).map_err(|e| {
                ApiError::Validation(format!("description is not a valid outline: {}", e))
            })?;
        }
        ebook.description = description;
    }
    ebook.updated_at = Utc::now();

    ebooks::update_details(&conn, &ebook)?;
    Ok(HttpResponse::Ok().json(ebook))
}
