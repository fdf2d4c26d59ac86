//! `POST /ebook/queue/{description,content,pdf}`.

use crate::app::AppState;
use crate::db::ebooks;
use crate::error::{ApiError, ApiResult};
use crate::job_controller::{new_job_id, EbookJobData};
use crate::pdf::PdfTemplate;
use crate::rate_limit::enforce;
use crate::tenant::TenantContext;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::jobs::{EnqueuedJob, JobStep};
use common::model::ebook::{Ebook, EbookMetadata, EbookStatus};
use common::requests::EnqueueStageRequest;
use log::{info, warn};

pub(crate) async fn description(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<EnqueueStageRequest>,
) -> ApiResult<HttpResponse> {
    enqueue_stage(&ctx, &state, body.into_inner(), JobStep::Description).await
}

pub(crate) async fn content(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<EnqueueStageRequest>,
) -> ApiResult<HttpResponse> {
    enqueue_stage(&ctx, &state, body.into_inner(), JobStep::Content).await
}

pub(crate) async fn pdf(
    ctx: TenantContext,
    state: web::Data<AppState>,
    body: web::Json<EnqueueStageRequest>,
) -> ApiResult<HttpResponse> {
    enqueue_stage(&ctx, &state, body.into_inner(), JobStep::Pdf).await
}

/// Status the ebook moves to once `step` is queued.
fn queued_status(ebook: &Ebook, step: JobStep) -> ApiResult<EbookStatus> {
    match step {
        JobStep::Content if ebook.description.is_none() => {
            return Err(ApiError::validation(
                "the description must be generated before the content",
            ))
        }
        JobStep::Pdf if ebook.description.is_none() || ebook.content.is_none() => {
            return Err(ApiError::validation(
                "the description and the content must exist before the PDF",
            ))
        }
        _ => {}
    }
    if ebook.status.is_in_flight() {
        return Err(ApiError::Conflict(format!(
            "ebook is already being processed ({})",
            ebook.status
        )));
    }
    Ok(match step {
        JobStep::Description if ebook.status == EbookStatus::Error => EbookStatus::Draft,
        JobStep::Description => ebook.status,
        JobStep::Content => EbookStatus::Generating,
        JobStep::Pdf => EbookStatus::GeneratingPdf,
    })
}

/// Rejects a trigger while the job recorded on the ebook has not finished.
async fn ensure_idle(state: &AppState, ebook: &Ebook) -> ApiResult<()> {
    let Some(metadata) = &ebook.metadata else {
        return Ok(());
    };
    match state.jobs.get(&metadata.job_id).await {
        Some(job) if job.finished_on.is_none() => Err(ApiError::Conflict(format!(
            "{} job {} is still running for this ebook",
            metadata.step, metadata.job_id
        ))),
        _ => Ok(()),
    }
}

async fn enqueue_stage(
    ctx: &TenantContext,
    state: &AppState,
    req: EnqueueStageRequest,
    step: JobStep,
) -> ApiResult<HttpResponse> {
    let template = match step {
        JobStep::Pdf => Some(PdfTemplate::parse(req.template.as_deref())?),
        _ => None,
    };
    let ebook = {
        let conn = state.db.lock()?;
        ebooks::find(&conn, &ctx.agency_id, &req.ebook_id)?
    };
    let next = queued_status(&ebook, step)?;
    ensure_idle(state, &ebook).await?;
    if matches!(step, JobStep::Description | JobStep::Content) {
        enforce(state.limiters.ai.as_ref(), &ctx.agency_id)?;
    }

    // Recorded before the job is handed over, so a worker never sees a stale row.
    let job_id = new_job_id();
    let metadata = EbookMetadata {
        job_id: job_id.clone(),
        step,
        queued_at: Utc::now(),
    };
    {
        let conn = state.db.lock()?;
        ebooks::record_queued(
            &conn,
            &ctx.agency_id,
            &ebook.id,
            ebook.status,
            ebook.metadata.as_ref().map(|m| m.job_id.as_str()),
            next,
            &metadata,
        )?;
    }

    let data = EbookJobData {
        ebook_id: ebook.id.clone(),
        agency_id: ctx.agency_id.clone(),
        step,
        template,
    };
    if let Err(e) = state.jobs.enqueue(&job_id, data).await {
        let conn = state.db.lock()?;
        let restored = ebooks::unqueue(
            &conn,
            &ctx.agency_id,
            &ebook.id,
            &job_id,
            ebook.status,
            ebook.metadata.as_ref(),
        );
        if let Err(revert) = restored {
            warn!("could not restore ebook {} after rejected job: {}", ebook.id, revert);
        }
        return Err(e);
    }

    info!(
        "queued {} job {} for ebook {} (agency {})",
        step, job_id, ebook.id, ctx.agency_id
    );
    Ok(HttpResponse::Accepted().json(EnqueuedJob {
        job_id,
        ebook_id: ebook.id,
        step,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ebook(status: EbookStatus, description: bool, content: bool) -> Ebook {
        Ebook {
            id: "e1".to_string(),
            agency_id: "a1".to_string(),
            title: "Guia".to_string(),
            description: description.then(|| "{}".to_string()),
            content: content.then(|| "{}".to_string()),
            status,
            pdf_url: None,
            metadata: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn stage_targets() {
        let draft = ebook(EbookStatus::Draft, false, false);
        assert_eq!(queued_status(&draft, JobStep::Description).unwrap(), EbookStatus::Draft);

        let failed = ebook(EbookStatus::Error, true, false);
        assert_eq!(queued_status(&failed, JobStep::Description).unwrap(), EbookStatus::Draft);
        assert_eq!(queued_status(&failed, JobStep::Content).unwrap(), EbookStatus::Generating);

        let ready = ebook(EbookStatus::ContentReady, true, true);
        assert_eq!(queued_status(&ready, JobStep::Pdf).unwrap(), EbookStatus::GeneratingPdf);
    }

    #[test]
    fn stage_guards() {
        let draft = ebook(EbookStatus::Draft, false, false);
        assert!(matches!(
            queued_status(&draft, JobStep::Content),
            Err(ApiError::Validation(_))
        ));

        let no_content = ebook(EbookStatus::DescriptionApproved, true, false);
        assert!(matches!(
            queued_status(&no_content, JobStep::Pdf),
            Err(ApiError::Validation(_))
        ));

        let running = ebook(EbookStatus::Generating, true, false);
        assert!(matches!(
            queued_status(&running, JobStep::Description),
            Err(ApiError::Conflict(_))
        ));
        let rendering = ebook(EbookStatus::GeneratingPdf, true, true);
        assert!(matches!(
            queued_status(&rendering, JobStep::Pdf),
            Err(ApiError::Conflict(_))
        ));
    }
}
