//! Manages the state of long-running, asynchronous background jobs.
//!
//! Ebook stages run outside the request/response cycle. Their progress is
//! tracked here:
//! - `JobsState`: a clonable, thread-safe handle on every known job. It lives
//!   inside the `JobQueue` held by the application state.
//! - `JobUpdate`: a message a worker sends when its job starts, progresses,
//!   completes or fails.
//! - `start_job_updater`: a long-running task that receives `JobUpdate`s on an
//!   MPSC channel and applies them to the shared map.
//! - `sweep_finished_jobs`: forgets finished jobs once their retention ends.

use crate::job_controller::queue::EbookJobData;
use chrono::{DateTime, Utc};
use common::jobs::{JobState, JobView};
use log::{debug, warn};
use std::{collections::HashMap, sync::Arc};
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

const SWEEP_EVERY: Duration = Duration::from_secs(60);

/// One queued stage and its lifecycle timestamps.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub data: EbookJobData,
    pub progress: u8,
    pub result: Option<String>,
    pub failed_reason: Option<String>,
    pub created_on: DateTime<Utc>,
    pub processed_on: Option<DateTime<Utc>>,
    pub finished_on: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(id: String, data: EbookJobData) -> Self {
        Self {
            id,
            data,
            progress: 0,
            result: None,
            failed_reason: None,
            created_on: Utc::now(),
            processed_on: None,
            finished_on: None,
        }
    }

    /// Coarse state derived from the timestamps.
    pub fn state(&self) -> JobState {
        match (self.processed_on, self.finished_on) {
            (None, _) => JobState::Waiting,
            (Some(_), None) => JobState::Active,
            (Some(_), Some(_)) if self.failed_reason.is_some() => JobState::Failed,
            (Some(_), Some(_)) => JobState::Completed,
        }
    }

    pub fn view(&self) -> JobView {
        JobView {
            job_id: self.id.clone(),
            ebook_id: self.data.ebook_id.clone(),
            step: self.data.step,
            state: self.state(),
            progress: self.progress,
            result: self.result.clone(),
            failed_reason: self.failed_reason.clone(),
        }
    }

    fn apply(&mut self, event: JobEvent) {
        let now = Utc::now();
        match event {
            JobEvent::Started => self.processed_on = Some(now),
            JobEvent::Progress(pct) => self.progress = pct.min(100),
            JobEvent::Completed(result) => {
                self.processed_on.get_or_insert(now);
                self.finished_on = Some(now);
                self.progress = 100;
                self.result = Some(result);
            }
            JobEvent::Failed(reason) => {
                self.processed_on.get_or_insert(now);
                self.finished_on = Some(now);
                self.failed_reason = Some(reason);
            }
        }
    }
}

/// A thread-safe, shareable container for the state of all background jobs.
#[derive(Clone)]
pub struct JobsState {
    /// Job id to job. Read by the status endpoint, written by the updater
    /// task and by `JobQueue::enqueue`.
    pub jobs: Arc<RwLock<HashMap<String, Job>>>,

    /// Workers push `JobUpdate`s here instead of writing the map directly.
    pub tx: mpsc::Sender<JobUpdate>,
}

impl JobsState {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let state = Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        (state, rx)
    }

    /// Drops jobs that finished before `cutoff`. Returns how many went.
    pub async fn evict_finished(&self, cutoff: DateTime<Utc>) -> usize {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| !matches!(job.finished_on, Some(finished) if finished < cutoff));
        before - jobs.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Started,
    Progress(u8),
    Completed(String),
    Failed(String),
}

/// A status change for one job, sent by a worker.
#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) event: JobEvent,
}

/// Periodically evicts jobs finished more than `retention` ago.
pub async fn sweep_finished_jobs(state: JobsState, retention: Duration) {
    let ttl = chrono::Duration::from_std(retention).unwrap_or_else(|_| chrono::Duration::days(365));
    let mut interval = tokio::time::interval(retention.min(SWEEP_EVERY));
    loop {
        interval.tick().await;
        let Some(cutoff) = Utc::now().checked_sub_signed(ttl) else {
            continue;
        };
        let evicted = state.evict_finished(cutoff).await;
        if evicted > 0 {
            debug!("evicted {} finished jobs", evicted);
        }
    }
}

/// Applies `JobUpdate`s to the shared map.
///
/// Spawned once at startup, next to the workers. `JobsState` holds a sender
/// itself, so the loop runs for the lifetime of the process.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        match jobs.get_mut(&update.job_id) {
            Some(job) => job.apply(update.event),
            None => warn!("update for unknown job {}", update.job_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::jobs::JobStep;

    fn job() -> Job {
        Job::new(
            "job-1".to_string(),
            EbookJobData {
                ebook_id: "ebook-1".to_string(),
                agency_id: "agency-1".to_string(),
                step: JobStep::Content,
                template: None,
            },
        )
    }

    #[test]
    fn state_follows_timestamps() {
        let mut job = job();
        assert_eq!(job.state(), JobState::Waiting);

        job.apply(JobEvent::Started);
        assert_eq!(job.state(), JobState::Active);

        job.apply(JobEvent::Progress(40));
        assert_eq!(job.progress, 40);

        job.apply(JobEvent::Completed("ok".to_string()));
        assert_eq!(job.state(), JobState::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(job.view().result.as_deref(), Some("ok"));
    }

    #[test]
    fn failure_is_reported_with_reason() {
        let mut job = job();
        job.apply(JobEvent::Failed("boom".to_string()));
        assert_eq!(job.state(), JobState::Failed);

        let view = job.view();
        assert_eq!(view.failed_reason.as_deref(), Some("boom"));
        assert_eq!(view.ebook_id, "ebook-1");
        assert_eq!(view.step, JobStep::Content);
    }

    #[tokio::test]
    async fn updater_applies_events_in_order() {
        let (state, rx) = JobsState::new(8);
        state.jobs.write().await.insert("job-1".to_string(), job());
        let updater = tokio::spawn(start_job_updater(state.clone(), rx));

        for event in [JobEvent::Started, JobEvent::Progress(120)] {
            state
                .tx
                .send(JobUpdate {
                    job_id: "job-1".to_string(),
                    event,
                })
                .await
                .unwrap();
        }

        let mut progress = 0;
        for _ in 0..100 {
            progress = state.jobs.read().await["job-1"].progress;
            if progress == 100 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        updater.abort();

        assert_eq!(progress, 100);
        assert_eq!(state.jobs.read().await["job-1"].state(), JobState::Active);
    }

    #[tokio::test]
    async fn eviction_keeps_running_and_recent_jobs() {
        let (state, _rx) = JobsState::new(8);
        let now = Utc::now();
        let mut old = job();
        old.id = "old".to_string();
        old.apply(JobEvent::Completed("done".to_string()));
        old.finished_on = Some(now - chrono::Duration::hours(2));
        let mut recent = job();
        recent.id = "recent".to_string();
        recent.apply(JobEvent::Failed("boom".to_string()));
        let mut running = job();
        running.id = "running".to_string();
        running.apply(JobEvent::Started);
        {
            let mut jobs = state.jobs.write().await;
            for job in [old, recent, running] {
                jobs.insert(job.id.clone(), job);
            }
        }

        let evicted = state.evict_finished(now - chrono::Duration::hours(1)).await;

        assert_eq!(evicted, 1);
        let jobs = state.jobs.read().await;
        assert!(!jobs.contains_key("old"));
        assert!(jobs.contains_key("recent"));
        assert!(jobs.contains_key("running"));
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_runs_on_its_own() {
        let (state, _rx) = JobsState::new(8);
        let mut done = job();
        done.apply(JobEvent::Completed("ok".to_string()));
        done.finished_on = Some(Utc::now() - chrono::Duration::hours(3));
        state.jobs.write().await.insert(done.id.clone(), done);

        let sweeper = tokio::spawn(sweep_finished_jobs(state.clone(), Duration::from_secs(3600)));
        tokio::time::sleep(Duration::from_secs(1)).await;
        sweeper.abort();

        assert!(state.jobs.read().await.is_empty());
    }
}
