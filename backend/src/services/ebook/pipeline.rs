//! Runs the three ebook stages for the job workers.

use crate::db::{ebooks, Database};
use crate::error::{ApiError, ApiResult};
use crate::job_controller::{EbookJobData, JobProcessor, JobReporter, QueuedJob};
use crate::llm::{parse_json, strip_code_fence, ChatCompletion, LlmError};
use crate::pdf::{EbookDocument, PdfRenderer, PdfStore};
use crate::services::ebook::prompts;
use async_trait::async_trait;
use common::jobs::JobStep;
use common::model::ebook::{Ebook, EbookContent, EbookOutline};
use log::{error, info, warn};
use std::sync::Arc;

pub struct EbookPipeline {
    db: Database,
    llm: Arc<dyn ChatCompletion>,
    pdf: Arc<dyn PdfRenderer>,
    store: PdfStore,
}

impl EbookPipeline {
    pub fn new(
        db: Database,
        llm: Arc<dyn ChatCompletion>,
        pdf: Arc<dyn PdfRenderer>,
        store: PdfStore,
    ) -> Self {
        Self { db, llm, pdf, store }
    }

    fn load(&self, data: &EbookJobData) -> ApiResult<Ebook> {
        let conn = self.db.lock()?;
        ebooks::find(&conn, &data.agency_id, &data.ebook_id)
    }

    async fn describe(&self, job: &QueuedJob, reporter: &JobReporter) -> ApiResult<String> {
        let ebook = self.load(&job.data)?;
        reporter.progress(10).await;

        let reply = self.llm.complete(prompts::outline(&ebook.title)).await?;
        reporter.progress(80).await;
        let outline: EbookOutline = parse_json(&reply)?;
        if outline.chapters.is_empty() {
            return Err(LlmError::InvalidResponse("outline has no chapters".to_string()).into());
        }

        let description = serde_json::to_string(&outline)?;
        let conn = self.db.lock()?;
        ebooks::store_description(&conn, &job.data.agency_id, &ebook.id, &job.id, &description)?;
        Ok(format!("outline with {} chapters", outline.chapters.len()))
    }

    async fn write(&self, job: &QueuedJob, reporter: &JobReporter) -> ApiResult<String> {
        let ebook = self.load(&job.data)?;
        let outline = stored_outline(&ebook)?;
        reporter.progress(10).await;

        let reply = self
            .llm
            .complete(prompts::content(&ebook.title, &outline))
            .await?;
        reporter.progress(85).await;
        let content: EbookContent = parse_json(&reply)?;
        if content.chapters.is_empty() {
            return Err(LlmError::InvalidResponse("content has no chapters".to_string()).into());
        }

        let conn = self.db.lock()?;
        ebooks::store_content(
            &conn,
            &job.data.agency_id,
            &ebook.id,
            &job.id,
            strip_code_fence(&reply),
        )?;
        Ok(format!("{} chapters written", content.chapters.len()))
    }

    async fn render(&self, job: &QueuedJob, reporter: &JobReporter) -> ApiResult<String> {
        let ebook = self.load(&job.data)?;
        let outline = stored_outline(&ebook)?;
        let content: EbookContent = match ebook.content.as_deref() {
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| ApiError::Validation(format!("stored content is not valid: {}", e)))?,
            None => return Err(ApiError::validation("ebook has no content")),
        };
        let template = job.data.template.unwrap_or_default();
        reporter.progress(10).await;

        let document = EbookDocument::assemble(&ebook.title, &outline, &content);
        let bytes = self.pdf.render(&document, template).await?;
        reporter.progress(80).await;
        let url = self.store.save(&ebook.id, &bytes).await?;
        reporter.progress(95).await;

        let conn = self.db.lock()?;
        ebooks::store_pdf(&conn, &job.data.agency_id, &ebook.id, &job.id, &url)?;
        Ok(url)
    }

    fn mark_failed(&self, job: &QueuedJob) {
        let data = &job.data;
        let marked = self
            .db
            .lock()
            .and_then(|conn| ebooks::mark_error(&conn, &data.agency_id, &data.ebook_id, &job.id));
        if let Err(e) = marked {
            warn!("could not mark ebook {} as failed: {}", data.ebook_id, e);
        }
    }
}

fn stored_outline(ebook: &Ebook) -> ApiResult<EbookOutline> {
    match ebook.description.as_deref() {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| ApiError::Validation(format!("stored outline is not valid: {}", e))),
        None => Err(ApiError::validation("ebook has no description")),
    }
}

#[async_trait]
impl JobProcessor for EbookPipeline {
    async fn process(&self, job: &QueuedJob, reporter: &JobReporter) -> ApiResult<String> {
        let result = match job.data.step {
            JobStep::Description => self.describe(job, reporter).await,
            JobStep::Content => self.write(job, reporter).await,
            JobStep::Pdf => self.render(job, reporter).await,
        };
        match &result {
            Ok(_) => info!(
                "ebook {} finished {} stage (job {})",
                job.data.ebook_id, job.data.step, job.id
            ),
            Err(ApiError::NotFound(_)) => {
                warn!("ebook {} vanished before job {} ran", job.data.ebook_id, job.id)
            }
            Err(ApiError::Conflict(reason)) => {
                warn!("ebook {} dropped job {}: {}", job.data.ebook_id, job.id, reason)
            }
            Err(e) => {
                error!(
                    "ebook {} {} stage failed (job {}, agency {}): {}",
                    job.data.ebook_id, job.data.step, job.id, job.data.agency_id, e
                );
                self.mark_failed(job);
            }
        }
        result
    }
}
