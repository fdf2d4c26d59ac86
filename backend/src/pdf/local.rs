use crate::pdf::markup::{self, Block, TextSegment, TextStyle};
use crate::pdf::{EbookDocument, PdfError, PdfRenderer, PdfTemplate};
use async_trait::async_trait;
use genpdf::elements::{Break, PageBreak, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{Alignment, Document, SimplePageDecorator};
use log::debug;
use std::path::PathBuf;

/// Renders in-process with `genpdf`. Needs a TTF family under `fonts_dir`.
pub struct LocalPdfRenderer {
    fonts_dir: PathBuf,
}

/// Sizes in points.
struct Layout {
    body_size: u8,
    line_spacing: f64,
    margins_mm: i32,
    title_size: u8,
    chapter_size: u8,
    accent: Color,
}

fn layout(template: PdfTemplate) -> Layout {
    match template {
        PdfTemplate::Classic => Layout {
            body_size: 11,
            line_spacing: 1.4,
            margins_mm: 25,
            title_size: 28,
            chapter_size: 20,
            accent: Color::Rgb(122, 31, 31),
        },
        PdfTemplate::Modern => Layout {
            body_size: 10,
            line_spacing: 1.3,
            margins_mm: 20,
            title_size: 30,
            chapter_size: 20,
            accent: Color::Rgb(79, 70, 229),
        },
        PdfTemplate::Minimal => Layout {
            body_size: 10,
            line_spacing: 1.2,
            margins_mm: 18,
            title_size: 24,
            chapter_size: 16,
            accent: Color::Rgb(17, 17, 17),
        },
    }
}

impl LocalPdfRenderer {
    pub fn new(fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
        }
    }

    /// Tries Arial first, then LiberationSans, from the same directory.
    fn load_font(&self) -> Result<FontFamily<FontData>, PdfError> {
        if let Ok(family) = genpdf::fonts::from_files(&self.fonts_dir, "Arial", None) {
            return Ok(family);
        }
        genpdf::fonts::from_files(&self.fonts_dir, "LiberationSans", None).map_err(|e| {
            PdfError::Font(format!("{} ({})", e, self.fonts_dir.display()))
        })
    }

    fn render_blocking(&self, doc: &EbookDocument, template: PdfTemplate) -> Result<Vec<u8>, PdfError> {
        let layout = layout(template);
        let mut pdf = Document::new(self.load_font()?);
        pdf.set_title(doc.title.clone());
        pdf.set_font_size(layout.body_size);
        pdf.set_line_spacing(layout.line_spacing);

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(layout.margins_mm);
        pdf.set_page_decorator(decorator);

        push_cover(&mut pdf, doc, &layout);
        push_contents(&mut pdf, doc, &layout);

        for chapter in &doc.chapters {
            pdf.push(PageBreak::new());
            pdf.push(heading(&chapter.title, layout.chapter_size, layout.accent));
            pdf.push(Break::new(1));
            if let Some(summary) = &chapter.summary {
                pdf.push(Paragraph::new(StyledString::new(
                    summary.clone(),
                    Style::new().italic(),
                )));
                pdf.push(Break::new(1));
            }
            push_body(&mut pdf, &chapter.body, &layout);
        }

        let mut buffer = Vec::new();
        pdf.render(&mut buffer)
            .map_err(|e| PdfError::Render(e.to_string()))?;
        Ok(buffer)
    }
}

#[async_trait]
impl PdfRenderer for LocalPdfRenderer {
    async fn render(&self, doc: &EbookDocument, template: PdfTemplate) -> Result<Vec<u8>, PdfError> {
        let renderer = LocalPdfRenderer::new(self.fonts_dir.clone());
        let doc = doc.clone();
        debug!("rendering '{}' with template {} locally", doc.title, template);
        tokio::task::spawn_blocking(move || renderer.render_blocking(&doc, template))
            .await
            .map_err(|e| PdfError::Render(format!("render task aborted: {}", e)))?
    }
}

fn heading(text: &str, size: u8, color: Color) -> Paragraph {
    Paragraph::new(StyledString::new(
        text.to_string(),
        Style::new().bold().with_font_size(size).with_color(color),
    ))
}

fn push_cover(pdf: &mut Document, doc: &EbookDocument, layout: &Layout) {
    pdf.push(Break::new(8));
    pdf.push(heading(&doc.title, layout.title_size, layout.accent).aligned(Alignment::Center));
    if let Some(subtitle) = &doc.subtitle {
        pdf.push(Break::new(1));
        pdf.push(
            Paragraph::new(StyledString::new(
                subtitle.clone(),
                Style::new().with_font_size(layout.body_size + 6),
            ))
            .aligned(Alignment::Center),
        );
    }
    if let Some(audience) = &doc.target_audience {
        pdf.push(Break::new(3));
        pdf.push(
            Paragraph::new(StyledString::new(
                format!("Para: {}", audience),
                Style::new().italic(),
            ))
            .aligned(Alignment::Center),
        );
    }
}

fn push_contents(pdf: &mut Document, doc: &EbookDocument, layout: &Layout) {
    pdf.push(PageBreak::new());
    pdf.push(heading("Sumário", layout.chapter_size, layout.accent));
    pdf.push(Break::new(1));
    for (idx, chapter) in doc.chapters.iter().enumerate() {
        pdf.push(Paragraph::new(format!("{}. {}", idx + 1, chapter.title)));
    }
    if !doc.objectives.is_empty() {
        pdf.push(Break::new(2));
        pdf.push(heading("O que você vai aprender", layout.body_size + 4, layout.accent));
        for objective in &doc.objectives {
            pdf.push(bullet(&[TextSegment {
                text: objective.clone(),
                style: TextStyle::Regular,
            }]));
        }
    }
}

fn push_body(pdf: &mut Document, body: &str, layout: &Layout) {
    for block in markup::blocks(body) {
        match block {
            Block::Heading { level, text } => {
                let size = layout.body_size + 8u8.saturating_sub(level * 2).max(2);
                pdf.push(Break::new(1));
                pdf.push(heading(&text, size, layout.accent));
            }
            Block::Bullet(text) => pdf.push(bullet(&markup::parse_styles(&text))),
            Block::Paragraph(text) => {
                let mut p = Paragraph::new("");
                push_segments_into_paragraph(&mut p, &markup::parse_styles(&text));
                pdf.push(p);
                pdf.push(Break::new(0.5));
            }
        }
    }
}

fn bullet(segments: &[TextSegment]) -> Paragraph {
    let mut p = Paragraph::new("");
    p.push(StyledString::new("• ", Style::new()));
    push_segments_into_paragraph(&mut p, segments);
    p
}

fn push_segments_into_paragraph(p: &mut Paragraph, segments: &[TextSegment]) {
    for seg in segments {
        let style = match seg.style {
            TextStyle::Regular => Style::new(),
            TextStyle::Bold => Style::new().bold(),
            TextStyle::Italic => Style::new().italic(),
            TextStyle::BoldItalic => Style::new().bold().italic(),
        };
        p.push(StyledString::new(seg.text.clone(), style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_fonts_is_a_font_error() {
        let dir = TempDir::new().unwrap();
        let renderer = LocalPdfRenderer::new(dir.path());
        let doc = EbookDocument {
            title: "Sem fontes".to_string(),
            subtitle: None,
            target_audience: None,
            objectives: Vec::new(),
            chapters: Vec::new(),
        };
        let err = renderer.render(&doc, PdfTemplate::Classic).await.unwrap_err();
        assert!(matches!(err, PdfError::Font(_)));
    }
}
