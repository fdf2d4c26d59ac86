//! In-process job controller for the ebook stages.
//!
//! - `state`: the shared job map, the task folding `JobUpdate`s into it and
//!   the retention sweep.
//! - `queue`: enqueueing, lookup and the bounded worker pool.

pub mod queue;
pub mod state;

pub use queue::{new_job_id, run_workers, EbookJobData, JobProcessor, JobQueue, JobReporter, QueuedJob};
pub use state::{start_job_updater, sweep_finished_jobs, JobsState};
