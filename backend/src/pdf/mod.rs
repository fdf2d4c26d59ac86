//! Ebook PDF rendering.
//!
//! `PdfRenderer` turns an `EbookDocument` into PDF bytes. Two backends exist:
//! a remote HTML-to-PDF service (`MarkupGoRenderer`) and an in-process
//! `genpdf` renderer (`LocalPdfRenderer`). `PdfStore` puts the bytes on disk.

pub mod html;
mod local;
mod markup;
mod markupgo;
mod store;

pub use local::LocalPdfRenderer;
pub use markupgo::MarkupGoRenderer;
pub use store::PdfStore;

use crate::config::{PdfRendererKind, PdfSettings};
use crate::error::ApiError;
use async_trait::async_trait;
use common::model::ebook::{EbookContent, EbookOutline};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("PDF service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("PDF service API key is not configured")]
    NotConfigured,

    #[error("failed to load fonts: {0}")]
    Font(String),

    #[error("failed to render PDF: {0}")]
    Render(String),

    #[error("PDF storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PdfError> for ApiError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::Io(e) => ApiError::Internal(e.to_string()),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

/// Visual style of the generated ebook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PdfTemplate {
    Classic,
    #[default]
    Modern,
    Minimal,
}

impl PdfTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfTemplate::Classic => "CLASSIC",
            PdfTemplate::Modern => "MODERN",
            PdfTemplate::Minimal => "MINIMAL",
        }
    }

    /// `None` selects the default template.
    pub fn parse(value: Option<&str>) -> Result<Self, ApiError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(PdfTemplate::default()),
            Some(v) => v.parse().map_err(ApiError::Validation),
        }
    }
}

impl fmt::Display for PdfTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PdfTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CLASSIC" => Ok(PdfTemplate::Classic),
            "MODERN" => Ok(PdfTemplate::Modern),
            "MINIMAL" => Ok(PdfTemplate::Minimal),
            _ => Err(format!(
                "invalid template '{}': expected CLASSIC, MODERN or MINIMAL",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChapter {
    pub title: String,
    pub summary: Option<String>,
    /// Chapter body with light markdown.
    pub body: String,
}

/// Everything a renderer needs, assembled from the ebook row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EbookDocument {
    pub title: String,
    pub subtitle: Option<String>,
    pub target_audience: Option<String>,
    pub objectives: Vec<String>,
    pub chapters: Vec<DocumentChapter>,
}

impl EbookDocument {
    /// Chapters come from the generated content; outline summaries are
    /// attached by position.
    pub fn assemble(title: &str, outline: &EbookOutline, content: &EbookContent) -> Self {
        let chapters = content
            .chapters
            .iter()
            .enumerate()
            .map(|(idx, chapter)| DocumentChapter {
                title: chapter.title.clone(),
                summary: outline
                    .chapters
                    .get(idx)
                    .map(|c| c.summary.trim().to_string())
                    .filter(|s| !s.is_empty()),
                body: chapter.content.clone(),
            })
            .collect();

        Self {
            title: title.to_string(),
            subtitle: outline.subtitle.clone().filter(|s| !s.trim().is_empty()),
            target_audience: Some(outline.target_audience.trim().to_string())
                .filter(|s| !s.is_empty()),
            objectives: outline.objectives.clone(),
            chapters,
        }
    }
}

#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, doc: &EbookDocument, template: PdfTemplate) -> Result<Vec<u8>, PdfError>;
}

/// Picks the configured backend.
pub fn build_renderer(settings: &PdfSettings) -> Result<Arc<dyn PdfRenderer>, PdfError> {
    Ok(match settings.renderer {
        PdfRendererKind::Markupgo => Arc::new(MarkupGoRenderer::new(settings)?),
        PdfRendererKind::Local => Arc::new(LocalPdfRenderer::new(&settings.fonts_dir)),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use common::model::ebook::{ContentChapter, OutlineChapter};

    #[test]
    fn template_parsing() {
        assert_eq!(PdfTemplate::parse(None).unwrap(), PdfTemplate::Modern);
        assert_eq!(PdfTemplate::parse(Some("  ")).unwrap(), PdfTemplate::Modern);
        assert_eq!(PdfTemplate::parse(Some("classic")).unwrap(), PdfTemplate::Classic);
        assert_eq!(PdfTemplate::parse(Some("MINIMAL")).unwrap(), PdfTemplate::Minimal);
        assert!(matches!(
            PdfTemplate::parse(Some("fancy")),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn assemble_attaches_summaries_by_position() {
        let outline = EbookOutline {
            title: "Guia".to_string(),
            subtitle: Some("".to_string()),
            target_audience: "Donos de agência".to_string(),
            objectives: vec!["Vender mais".to_string()],
            chapters: vec![OutlineChapter {
                title: "Intro".to_string(),
                summary: "Visão geral".to_string(),
            }],
        };
        let content = EbookContent {
            chapters: vec![
                ContentChapter {
                    title: "Intro".to_string(),
                    content: "Texto".to_string(),
                },
                ContentChapter {
                    title: "Extra".to_string(),
                    content: "Mais".to_string(),
                },
            ],
        };

        let doc = EbookDocument::assemble("Meu Ebook", &outline, &content);
        assert_eq!(doc.title, "Meu Ebook");
        assert_eq!(doc.subtitle, None);
        assert_eq!(doc.target_audience.as_deref(), Some("Donos de agência"));
        assert_eq!(doc.chapters.len(), 2);
        assert_eq!(doc.chapters[0].summary.as_deref(), Some("Visão geral"));
        assert_eq!(doc.chapters[1].summary, None);
    }
}
