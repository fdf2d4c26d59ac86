//! Application state and route table.

use crate::config::Settings;
use crate::db::Database;
use crate::error::ApiError;
use crate::job_controller::{
    run_workers, start_job_updater, sweep_finished_jobs, JobQueue, JobsState,
};
use crate::llm::ChatCompletion;
use crate::pdf::{PdfRenderer, PdfStore};
use crate::rate_limit::RateLimiters;
use crate::services;
use crate::services::ebook::EbookPipeline;
use actix_web::web;
use log::info;
use std::sync::Arc;
use std::time::Duration;

/// Shared by every request handler as `web::Data<AppState>`.
pub struct AppState {
    pub settings: Settings,
    pub db: Database,
    pub jobs: JobQueue,
    pub llm: Arc<dyn ChatCompletion>,
    pub pdf_store: PdfStore,
    pub limiters: RateLimiters,
}

impl AppState {
    /// Builds the state and spawns the job updater and the stage workers.
    /// Must be called from inside the runtime.
    pub fn start(
        settings: Settings,
        db: Database,
        llm: Arc<dyn ChatCompletion>,
        pdf: Arc<dyn PdfRenderer>,
    ) -> web::Data<AppState> {
        let (jobs_state, updates) = JobsState::new(settings.queue.capacity);
        let (jobs, work) = JobQueue::new(jobs_state.clone(), settings.queue.capacity);
        let pdf_store = PdfStore::new(&settings.uploads);
        let limiters = RateLimiters::from_settings(&settings.rate_limit);

        tokio::spawn(start_job_updater(jobs_state.clone(), updates));
        tokio::spawn(sweep_finished_jobs(
            jobs_state,
            Duration::from_secs(settings.queue.retention_secs.max(1)),
        ));

        let pipeline = Arc::new(EbookPipeline::new(
            db.clone(),
            llm.clone(),
            pdf,
            pdf_store.clone(),
        ));
        let concurrency = settings.queue.concurrency;
        tokio::spawn(run_workers(jobs.clone(), work, pipeline, concurrency));
        info!("job workers started (concurrency {})", concurrency);

        web::Data::new(AppState {
            settings,
            db,
            jobs,
            llm,
            pdf_store,
            limiters,
        })
    }
}

/// Registers extractor configs and every service scope.
pub fn configure(cfg: &mut web::ServiceConfig, json_limit_bytes: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(json_limit_bytes)
            .error_handler(|err, _| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| ApiError::Validation(err.to_string()).into()),
    );

    cfg.service(services::health::configure_routes())
        .service(services::auth::configure_routes())
        .service(services::agency::configure_routes())
        .service(services::clients::configure_routes())
        .service(services::projects::configure_routes())
        .service(services::tasks::configure_routes())
        .service(services::finance::configure_routes())
        .service(services::copywriting::configure_routes())
        .service(services::ebook::configure_routes());
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers for HTTP-level tests: in-memory database, scripted LLM,
    //! recording PDF renderer, uploads in a temp dir.

    use super::*;
    use crate::db::agencies;
    use crate::llm::fake::ScriptedLlm;
    use crate::pdf::fake::RecordingRenderer;
    use crate::tenant::{password, session};
    use chrono::{Duration, Utc};
    use common::model::agency::{Plan, Role};
    use tempfile::TempDir;

    pub struct TestContext {
        pub state: web::Data<AppState>,
        pub llm: Arc<ScriptedLlm>,
        pub pdf: Arc<RecordingRenderer>,
        pub uploads: TempDir,
    }

    /// A signed-in user.
    pub struct Seeded {
        pub token: String,
        pub agency_id: String,
        pub user_id: String,
    }

    pub fn context(llm: ScriptedLlm, pdf: RecordingRenderer) -> TestContext {
        context_with(llm, pdf, |_| {})
    }

    /// Like `context`, with a chance to adjust settings before start-up.
    pub fn context_with(
        llm: ScriptedLlm,
        pdf: RecordingRenderer,
        adjust: impl FnOnce(&mut Settings),
    ) -> TestContext {
        let uploads = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.uploads.dir = uploads.path().to_string_lossy().into_owned();
        settings.rate_limit.ai_requests = 1000;
        settings.rate_limit.auth_requests = 1000;
        adjust(&mut settings);

        let llm = Arc::new(llm);
        let pdf = Arc::new(pdf);
        let state = AppState::start(
            settings,
            Database::in_memory().unwrap(),
            llm.clone(),
            pdf.clone(),
        );
        TestContext {
            state,
            llm,
            pdf,
            uploads,
        }
    }

    pub fn default_context() -> TestContext {
        context(ScriptedLlm::default(), RecordingRenderer::default())
    }

    /// Creates a fresh agency with one user of `role` and a live session.
    pub fn seed(state: &AppState, agency_name: &str, role: Role) -> Seeded {
        let conn = state.db.lock().unwrap();
        let agency = agencies::insert_agency(&conn, agency_name, Plan::Free).unwrap();
        seed_member(&conn, &agency.id, role)
    }

    /// Adds another signed-in user to an existing agency.
    pub fn seed_member(conn: &rusqlite::Connection, agency_id: &str, role: Role) -> Seeded {
        let email = format!("{}@example.com", uuid::Uuid::new_v4().simple());
        let hash = password::hash_password("secret-pass").unwrap();
        let user = agencies::insert_user(conn, agency_id, "Tester", &email, &hash, role).unwrap();
        let token = session::new_token();
        agencies::insert_session(
            conn,
            &session::hash_token(&token),
            &user.id,
            Utc::now() + Duration::hours(1),
        )
        .unwrap();
        Seeded {
            token,
            agency_id: agency_id.to_string(),
            user_id: user.id,
        }
    }

    pub fn bearer(seeded: &Seeded) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", seeded.token))
    }
}
