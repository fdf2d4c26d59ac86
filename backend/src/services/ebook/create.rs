use crate::app::AppState;
use crate::db::{ebooks, new_id};
use crate::error::ApiResult;
use crate::services::auth::required;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::ebook::{Ebook, EbookStatus};
use common::requests::CreateEbookRequest;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<CreateEbookRequest>,
) -> ApiResult<HttpResponse> {
    let now = Utc::now();
    let ebook = Ebook {
        id: new_id(),
        agency_id: ctx.agency_id.clone(),
        title: required(&body.title, "title")?,
        description: None,
        content: None,
        status: EbookStatus::Draft,
        pdf_url: None,
        metadata: None,
        created_at: now,
        updated_at: now,
    };

    let conn = state.db.lock()?;
    ebooks::insert(&conn, &ebook)?;
    Ok(HttpResponse::Created().json(ebook))
}
