mod app;
mod config;
mod db;
mod error;
mod job_controller;
mod llm;
mod pdf;
mod rate_limit;
mod services;
mod tenant;

use crate::config::Settings;
use crate::db::{agencies, Database};
use crate::llm::OpenAiClient;
use actix_web::{middleware, App, HttpServer};
use chrono::Utc;
use env_logger::Env;
use log::{error, info, warn};
use std::io;
use std::sync::Arc;
use std::time::Duration;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = Settings::load().map_err(|e| io::Error::other(format!("invalid settings: {}", e)))?;
    let db = Database::open(&settings.database.path).map_err(|e| {
        io::Error::other(format!("cannot open database {}: {}", settings.database.path, e))
    })?;
    info!("database ready at {}", settings.database.path);

    let llm = OpenAiClient::new(&settings.llm).map_err(io::Error::other)?;
    if settings.llm.api_key.is_none() {
        warn!("no LLM API key configured, AI endpoints will answer 502");
    }
    let pdf = pdf::build_renderer(&settings.pdf).map_err(io::Error::other)?;
    info!("PDF renderer: {:?}", settings.pdf.renderer);

    std::fs::create_dir_all(&settings.uploads.dir)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let json_limit = settings.server.json_limit_bytes;
    let uploads_dir = settings.uploads.dir.clone();
    let public_path = settings.uploads.public_path.clone();

    let state = app::AppState::start(settings, db.clone(), Arc::new(llm), pdf);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = db
                .lock()
                .and_then(|conn| agencies::purge_expired_sessions(&conn, Utc::now()));
            match purged {
                Ok(0) => {}
                Ok(n) => info!("purged {} expired sessions", n),
                Err(e) => error!("session purge failed: {}", e),
            }
        }
    });

    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(|cfg| app::configure(cfg, json_limit))
            .service(actix_files::Files::new(&public_path, &uploads_dir))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
