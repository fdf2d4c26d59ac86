//! Runtime settings.
//!
//! Sources, later ones winning:
//! 1. built-in defaults,
//! 2. `config/default.{toml,yaml,json}` and `config/{RUN_MODE}.*` (optional),
//! 3. `AGENCIAOS__SECTION__KEY` environment variables (`.env` is loaded first),
//! 4. `OPENAI_API_KEY` / `MARKUPGO_API_KEY` for the two provider secrets.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub uploads: UploadSettings,
    pub llm: LlmSettings,
    pub pdf: PdfSettings,
    pub rate_limit: RateLimitSettings,
    pub queue: QueueSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub json_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            json_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "agenciaos.sqlite".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub dir: String,
    /// URL prefix under which `dir` is served.
    pub public_path: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            dir: "uploads".to_string(),
            public_path: "/uploads".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PdfRendererKind {
    Markupgo,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    pub renderer: PdfRendererKind,
    pub markupgo_api_key: Option<String>,
    pub markupgo_base_url: String,
    pub fonts_dir: String,
    pub timeout_secs: u64,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            renderer: PdfRendererKind::Local,
            markupgo_api_key: None,
            markupgo_base_url: "https://api.markupgo.com/api/v1".to_string(),
            fonts_dir: "./fonts".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    /// Burst per key; the budget refills evenly over the window.
    pub ai_requests: u32,
    pub ai_window_secs: u64,
    pub auth_requests: u32,
    pub auth_window_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            ai_requests: 10,
            ai_window_secs: 60,
            auth_requests: 5,
            auth_window_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    /// Stage jobs processed at the same time.
    pub concurrency: usize,
    /// Jobs that may wait in the channel before enqueue is refused.
    pub capacity: usize,
    /// How long a finished job stays visible to the status endpoint.
    pub retention_secs: u64,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            concurrency: 2,
            capacity: 100,
            retention_secs: 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub session_ttl_hours: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl_hours: 24 * 7,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("AGENCIAOS")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            builder = builder.set_override("llm.api_key", key)?;
        }
        if let Ok(key) = std::env::var("MARKUPGO_API_KEY") {
            builder = builder.set_override("pdf.markupgo_api_key", key)?;
        }

        builder.build()?.try_deserialize()
    }
}
