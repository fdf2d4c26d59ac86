use crate::config::UploadSettings;
use crate::pdf::PdfError;
use log::{info, warn};
use std::path::PathBuf;
use uuid::Uuid;

const SUBDIR: &str = "ebooks";

/// Stores generated PDFs under `{uploads.dir}/ebooks` and maps them to the
/// URL they are served from.
#[derive(Debug, Clone)]
pub struct PdfStore {
    dir: PathBuf,
    public_prefix: String,
}

impl PdfStore {
    pub fn new(settings: &UploadSettings) -> Self {
        Self {
            dir: PathBuf::from(&settings.dir).join(SUBDIR),
            public_prefix: format!("{}/{}/", settings.public_path.trim_end_matches('/'), SUBDIR),
        }
    }

    /// Writes `{ebook_id}-{uuid}.pdf` and returns its public URL.
    pub async fn save(&self, ebook_id: &str, bytes: &[u8]) -> Result<String, PdfError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let file_name = format!("{}-{}.pdf", ebook_id, Uuid::new_v4());
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;
        info!("stored PDF {} ({} bytes)", file_name, bytes.len());
        Ok(format!("{}{}", self.public_prefix, file_name))
    }

    /// Deletes the file behind a URL returned by `save`. Unknown URLs and
    /// missing files are ignored. Returns whether a file was removed.
    pub async fn remove(&self, url: &str) -> bool {
        let Some(file_name) = url.strip_prefix(&self.public_prefix) else {
            warn!("not removing PDF outside the store: {}", url);
            return false;
        };
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.contains("..") {
            warn!("refusing to remove suspicious PDF path: {}", url);
            return false;
        }
        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to remove PDF {}: {}", file_name, e);
                false
            }
        }
    }
}
