//! HTML rendition of an ebook, fed to the remote PDF service.

use crate::pdf::markup::{self, Block, TextStyle};
use crate::pdf::{EbookDocument, PdfTemplate};
use std::fmt::Write;

struct Theme {
    body_font: &'static str,
    heading_font: &'static str,
    text: &'static str,
    accent: &'static str,
    cover_background: &'static str,
    cover_text: &'static str,
}

fn theme(template: PdfTemplate) -> Theme {
    match template {
        PdfTemplate::Classic => Theme {
            body_font: "Georgia, 'Times New Roman', serif",
            heading_font: "Georgia, 'Times New Roman', serif",
            text: "#2b2b2b",
            accent: "#7a1f1f",
            cover_background: "#f7f1e3",
            cover_text: "#2b2b2b",
        },
        PdfTemplate::Modern => Theme {
            body_font: "'Inter', 'Helvetica Neue', Arial, sans-serif",
            heading_font: "'Poppins', 'Helvetica Neue', Arial, sans-serif",
            text: "#1f2933",
            accent: "#4f46e5",
            cover_background: "linear-gradient(135deg, #4f46e5 0%, #9333ea 100%)",
            cover_text: "#ffffff",
        },
        PdfTemplate::Minimal => Theme {
            body_font: "'Helvetica Neue', Arial, sans-serif",
            heading_font: "'Helvetica Neue', Arial, sans-serif",
            text: "#111111",
            accent: "#111111",
            cover_background: "#ffffff",
            cover_text: "#111111",
        },
    }
}

fn stylesheet(t: &Theme) -> String {
    format!(
        "@page {{ size: A4; margin: 22mm 20mm; }}\n\
         body {{ font-family: {body}; color: {text}; font-size: 11.5pt; line-height: 1.6; }}\n\
         h1, h2, h3, h4 {{ font-family: {heading}; color: {accent}; line-height: 1.25; }}\n\
         .cover {{ page-break-after: always; min-height: 250mm; display: flex; flex-direction: column; \
         justify-content: center; padding: 0 12mm; background: {cover_bg}; color: {cover_text}; }}\n\
         .cover h1 {{ color: {cover_text}; font-size: 34pt; margin: 0 0 8mm; }}\n\
         .cover .subtitle {{ font-size: 16pt; margin: 0 0 12mm; }}\n\
         .cover .audience {{ font-size: 11pt; opacity: 0.85; }}\n\
         .toc {{ page-break-after: always; }}\n\
         .toc ol {{ padding-left: 6mm; }}\n\
         .toc li {{ margin: 2mm 0; }}\n\
         .chapter {{ page-break-before: always; }}\n\
         .chapter .summary {{ font-style: italic; border-left: 3px solid {accent}; padding-left: 4mm; }}\n",
        body = t.body_font,
        heading = t.heading_font,
        text = t.text,
        accent = t.accent,
        cover_bg = t.cover_background,
        cover_text = t.cover_text,
    )
}

/// Escapes text for element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn inline(text: &str) -> String {
    markup::parse_styles(text)
        .into_iter()
        .map(|seg| {
            let text = escape(&seg.text);
            match seg.style {
                TextStyle::Regular => text,
                TextStyle::Bold => format!("<strong>{}</strong>", text),
                TextStyle::Italic => format!("<em>{}</em>", text),
                TextStyle::BoldItalic => format!("<strong><em>{}</em></strong>", text),
            }
        })
        .collect()
}

fn push_body(out: &mut String, body: &str) {
    let mut in_list = false;
    for block in markup::blocks(body) {
        let is_bullet = matches!(block, Block::Bullet(_));
        if in_list && !is_bullet {
            out.push_str("</ul>\n");
            in_list = false;
        }
        match block {
            Block::Heading { level, text } => {
                // h1 is reserved for chapter titles.
                let level = (level + 1).clamp(2, 4);
                let _ = writeln!(out, "<h{level}>{}</h{level}>", inline(&text));
            }
            Block::Bullet(text) => {
                if !in_list {
                    out.push_str("<ul>\n");
                    in_list = true;
                }
                let _ = writeln!(out, "<li>{}</li>", inline(&text));
            }
            Block::Paragraph(text) => {
                let _ = writeln!(out, "<p>{}</p>", inline(&text));
            }
        }
    }
    if in_list {
        out.push_str("</ul>\n");
    }
}

/// Full standalone HTML page: cover, table of contents, one section per chapter.
pub fn render_html(doc: &EbookDocument, template: PdfTemplate) -> String {
    let t = theme(template);
    let mut out = String::new();
    let title = escape(&doc.title);

    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>\n{}</style>\n</head>\n<body class=\"template-{}\">\n",
        stylesheet(&t),
        template.as_str().to_ascii_lowercase(),
    );

    out.push_str("<section class=\"cover\">\n");
    let _ = writeln!(out, "<h1>{title}</h1>");
    if let Some(subtitle) = &doc.subtitle {
        let _ = writeln!(out, "<p class=\"subtitle\">{}</p>", escape(subtitle));
    }
    if let Some(audience) = &doc.target_audience {
        let _ = writeln!(out, "<p class=\"audience\">Para: {}</p>", escape(audience));
    }
    out.push_str("</section>\n");

    out.push_str("<section class=\"toc\">\n<h2>Sumário</h2>\n<ol>\n");
    for chapter in &doc.chapters {
        let _ = writeln!(out, "<li>{}</li>", escape(&chapter.title));
    }
    out.push_str("</ol>\n");
    if !doc.objectives.is_empty() {
        out.push_str("<h3>O que você vai aprender</h3>\n<ul>\n");
        for objective in &doc.objectives {
            let _ = writeln!(out, "<li>{}</li>", escape(objective));
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</section>\n");

    for (idx, chapter) in doc.chapters.iter().enumerate() {
        let _ = writeln!(
            out,
            "<section class=\"chapter\" id=\"chapter-{}\">\n<h1>{}</h1>",
            idx + 1,
            escape(&chapter.title)
        );
        if let Some(summary) = &chapter.summary {
            let _ = writeln!(out, "<p class=\"summary\">{}</p>", escape(summary));
        }
        push_body(&mut out, &chapter.body);
        out.push_str("</section>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::DocumentChapter;

    fn doc() -> EbookDocument {
        EbookDocument {
            title: "Vendas <B2B>".to_string(),
            subtitle: Some("Guia prático".to_string()),
            target_audience: None,
            objectives: vec!["Fechar contratos".to_string()],
            chapters: vec![DocumentChapter {
                title: "Prospecção".to_string(),
                summary: Some("Como achar clientes".to_string()),
                body: "# Passo 1\nUse **listas**.\n\n- LinkedIn\n- E-mail\n\nFim & pronto".to_string(),
            }],
        }
    }

    #[test]
    fn escapes_user_text() {
        let html = render_html(&doc(), PdfTemplate::Modern);
        assert!(html.contains("<h1>Vendas &lt;B2B&gt;</h1>"));
        assert!(html.contains("<p>Fim &amp; pronto</p>"));
        assert!(!html.contains("<B2B>"));
    }

    #[test]
    fn renders_structure() {
        let html = render_html(&doc(), PdfTemplate::Classic);
        assert!(html.contains("template-classic"));
        assert!(html.contains("<li>Prospecção</li>"));
        assert!(html.contains("<h2>Passo 1</h2>"));
        assert!(html.contains("<p>Use <strong>listas</strong>.</p>"));
        assert!(html.contains("<ul>\n<li>LinkedIn</li>\n<li>E-mail</li>\n</ul>"));
        assert!(html.contains("<p class=\"summary\">Como achar clientes</p>"));
        assert!(!html.contains("class=\"audience\""));
    }
}
