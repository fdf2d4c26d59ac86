use crate::app::AppState;
use crate::db::ebooks;
use crate::error::ApiResult;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};

/// A job still running for the ebook fails with "ebook not found".
pub(crate) async fn process(
    ctx: TenantContext,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let removed = {
        let conn = state.db.lock()?;
        ebooks::delete(&conn, &ctx.agency_id, &id)?
    };
    if let Some(url) = removed.pdf_url {
        state.pdf_store.remove(&url).await;
    }
    Ok(HttpResponse::NoContent().finish())
}
