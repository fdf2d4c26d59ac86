use crate::app::AppState;
use crate::db::ebooks;
use crate::error::{ApiError, ApiResult};
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use common::model::ebook::EbookStatus;

pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let conn = state.db.lock()?;
    let ebook = ebooks::find(&conn, &ctx.agency_id, &id)?;
    if ebook.status != EbookStatus::DescriptionGenerated {
        return Err(ApiError::Conflict(format!(
            "only a generated description can be approved, ebook is {}",
            ebook.status
        )));
    }
    ebooks::transition(
        &conn,
        &ctx.agency_id,
        &ebook.id,
        EbookStatus::DescriptionGenerated,
        EbookStatus::DescriptionApproved,
    )?;
    Ok(HttpResponse::Ok().json(ebooks::find(&conn, &ctx.agency_id, &ebook.id)?))
}
