use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    pub enum ContentKind {
        Instagram => "INSTAGRAM",
        Blog => "BLOG",
        Whatsapp => "WHATSAPP",
        Ad => "AD",
    }
}

text_enum! {
    pub enum AdPlatform {
        Facebook => "FACEBOOK",
        Instagram => "INSTAGRAM",
        Google => "GOOGLE",
        Linkedin => "LINKEDIN",
    }
}

/// A piece of copy produced by the LLM, kept as the agency's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub id: String,
    pub agency_id: String,
    pub user_id: String,
    pub kind: ContentKind,
    pub input: serde_json::Value,
    pub output: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCopy {
    pub id: String,
    pub kind: ContentKind,
    pub content: String,
}
