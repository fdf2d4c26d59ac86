use serde::{Deserialize, Serialize};

text_enum! {
    /// The three sequential stages of ebook generation.
    pub enum JobStep {
        Description => "description",
        Content => "content",
        Pdf => "pdf",
    }
}

text_enum! {
    /// Coarse state reported to clients polling a job.
    pub enum JobState {
        Waiting => "waiting",
        Active => "active",
        Completed => "completed",
        Failed => "failed",
    }
}

/// Public view of a queued stage, returned by `GET /ebook/queue/status/{jobId}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub job_id: String,
    pub ebook_id: String,
    pub step: JobStep,
    pub state: JobState,
    /// 0..=100
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_reason: Option<String>,
}

/// Returned when a stage is accepted onto the queue.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueuedJob {
    pub job_id: String,
    pub ebook_id: String,
    pub step: JobStep,
}
