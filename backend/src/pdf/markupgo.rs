use crate::config::PdfSettings;
use crate::pdf::{html, EbookDocument, PdfError, PdfRenderer, PdfTemplate};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

/// Renders through MarkupGo's HTML-to-PDF endpoint.
pub struct MarkupGoRenderer {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MarkupGoRenderer {
    pub fn new(settings: &PdfSettings) -> Result<Self, PdfError> {
        let api_key = settings
            .markupgo_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(PdfError::NotConfigured)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: settings.markupgo_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PdfRenderer for MarkupGoRenderer {
    async fn render(&self, doc: &EbookDocument, template: PdfTemplate) -> Result<Vec<u8>, PdfError> {
        let body = json!({
            "source": { "type": "html", "data": html::render_html(doc, template) },
            "options": {
                "format": "A4",
                "printBackground": true,
                "preferCSSPageSize": true,
            },
        });

        debug!("rendering '{}' with template {} via MarkupGo", doc.title, template);
        let response = self
            .client
            .post(format!("{}/pdf/buffer", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("MarkupGo returned {}: {}", status, body);
            return Err(PdfError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(PdfError::Render("empty PDF buffer".to_string()));
        }
        Ok(bytes.to_vec())
    }
}
