//! Ebook entity and the JSON documents it carries.
//!
//! `description` and `content` are stored as JSON-encoded strings so the raw
//! model output can be kept verbatim; `EbookOutline` and `EbookContent` are the
//! shapes those strings must parse into.

use crate::jobs::JobStep;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    /// Status only moves forward through the pipeline, or to `Error`.
    pub enum EbookStatus {
        Draft => "DRAFT",
        DescriptionGenerated => "DESCRIPTION_GENERATED",
        DescriptionApproved => "DESCRIPTION_APPROVED",
        Generating => "GENERATING",
        ContentReady => "CONTENT_READY",
        GeneratingPdf => "GENERATING_PDF",
        Completed => "COMPLETED",
        Error => "ERROR",
    }
}

impl EbookStatus {
    /// A stage job for this ebook is expected to be running.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, EbookStatus::Generating | EbookStatus::GeneratingPdf)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ebook {
    pub id: String,
    pub agency_id: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub status: EbookStatus,
    pub pdf_url: Option<String>,
    pub metadata: Option<EbookMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Last job handed to the queue for this ebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbookMetadata {
    pub job_id: String,
    pub step: JobStep,
    pub queued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineChapter {
    pub title: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbookOutline {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    pub chapters: Vec<OutlineChapter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChapter {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbookContent {
    pub chapters: Vec<ContentChapter>,
}
