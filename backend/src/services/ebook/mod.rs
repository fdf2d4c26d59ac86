//! Ebooks and their three-stage generation pipeline.
//!
//! Stages are queued by the `/ebook/queue/*` endpoints and run by the job
//! workers through `EbookPipeline`. Clients poll `/ebook/queue/status/{jobId}`
//! and re-read the ebook when the job finishes.

mod approve;
mod create;
mod delete;
mod enqueue;
mod get;
mod list;
mod pipeline;
mod prompts;
mod status;
mod update;

pub use pipeline::EbookPipeline;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/ebook";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/queue/description", post().to(enqueue::description))
        .route("/queue/content", post().to(enqueue::content))
        .route("/queue/pdf", post().to(enqueue::pdf))
        .route("/queue/status/{job_id}", get().to(status::process))
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/{id}", get().to(get::process))
        .route("/{id}", put().to(update::process))
        .route("/{id}", delete().to(delete::process))
        .route("/{id}/approve", post().to(approve::process))
}
