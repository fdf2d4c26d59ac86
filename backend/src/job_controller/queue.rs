use crate::error::{ApiError, ApiResult};
use crate::job_controller::state::{Job, JobEvent, JobUpdate, JobsState};
use crate::pdf::PdfTemplate;
use async_trait::async_trait;
use common::jobs::JobStep;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use uuid::Uuid;

/// Payload of one stage job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EbookJobData {
    pub ebook_id: String,
    pub agency_id: String,
    pub step: JobStep,
    /// Only meaningful for the pdf stage.
    pub template: Option<PdfTemplate>,
}

/// What a worker receives.
#[derive(Debug, Clone)]
pub struct QueuedJob {
    pub id: String,
    pub data: EbookJobData,
}

pub fn new_job_id() -> String {
    Uuid::new_v4().to_string()
}

/// Handle used by request handlers to submit and look up jobs.
#[derive(Clone)]
pub struct JobQueue {
    state: JobsState,
    work_tx: mpsc::Sender<QueuedJob>,
}

impl JobQueue {
    /// Returns the queue and the receiving end for `run_workers`.
    pub fn new(state: JobsState, capacity: usize) -> (Self, mpsc::Receiver<QueuedJob>) {
        let (work_tx, work_rx) = mpsc::channel(capacity.max(1));
        (Self { state, work_tx }, work_rx)
    }

    pub fn state(&self) -> &JobsState {
        &self.state
    }

    /// Registers the job as waiting and hands it to the workers. The id is
    /// chosen by the caller so it can be recorded before the job may start.
    pub async fn enqueue(&self, id: &str, data: EbookJobData) -> ApiResult<()> {
        self.state
            .jobs
            .write()
            .await
            .insert(id.to_string(), Job::new(id.to_string(), data.clone()));

        let job = QueuedJob {
            id: id.to_string(),
            data,
        };
        if let Err(e) = self.work_tx.try_send(job) {
            self.state.jobs.write().await.remove(id);
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "job queue is full",
                mpsc::error::TrySendError::Closed(_) => "job queue is not running",
            };
            warn!("rejecting job {}: {}", id, reason);
            return Err(ApiError::Unavailable(reason.to_string()));
        }
        Ok(())
    }

    pub async fn get(&self, job_id: &str) -> Option<Job> {
        self.state.jobs.read().await.get(job_id).cloned()
    }
}

/// Lets a running job report progress.
#[derive(Clone)]
pub struct JobReporter {
    job_id: String,
    tx: mpsc::Sender<JobUpdate>,
}

impl JobReporter {
    async fn send(&self, event: JobEvent) {
        let update = JobUpdate {
            job_id: self.job_id.clone(),
            event,
        };
        if self.tx.send(update).await.is_err() {
            error!("job updater is gone, dropping update for {}", self.job_id);
        }
    }

    pub async fn progress(&self, pct: u8) {
        self.send(JobEvent::Progress(pct)).await;
    }
}

#[async_trait]
pub trait JobProcessor: Send + Sync {
    /// Runs one job. `Ok` carries the job result, `Err` its failure reason.
    async fn process(&self, job: &QueuedJob, reporter: &JobReporter) -> ApiResult<String>;
}

/// Pulls jobs off the queue with at most `concurrency` running at once.
/// Returns when the queue's senders are gone.
pub async fn run_workers(
    queue: JobQueue,
    mut rx: mpsc::Receiver<QueuedJob>,
    processor: Arc<dyn JobProcessor>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    while let Some(job) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let processor = processor.clone();
        let reporter = JobReporter {
            job_id: job.id.clone(),
            tx: queue.state.tx.clone(),
        };

        tokio::spawn(async move {
            info!(
                "job {} started: step={} ebook={} agency={}",
                job.id, job.data.step, job.data.ebook_id, job.data.agency_id
            );
            reporter.send(JobEvent::Started).await;
            match processor.process(&job, &reporter).await {
                Ok(result) => {
                    info!("job {} completed", job.id);
                    reporter.send(JobEvent::Completed(result)).await;
                }
                Err(e) => {
                    error!("job {} failed: {}", job.id, e);
                    reporter.send(JobEvent::Failed(e.to_string())).await;
                }
            }
            drop(permit);
        });
    }
}
