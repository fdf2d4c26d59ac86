//! The small markdown subset chapter bodies are written in.

use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+?)\s*#*$").expect("valid heading pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Bullet(String),
    Paragraph(String),
}

// Longest marker first so `***` is not read as `**` + `*`.
const MARKERS: [(&str, TextStyle); 3] = [
    ("***", TextStyle::BoldItalic),
    ("**", TextStyle::Bold),
    ("*", TextStyle::Italic),
];

/// Splits a line into styled runs: `***bold italic***`, `**bold**`, `*italic*`.
/// Unmatched markers are kept as literal text.
pub fn parse_styles(line: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut rest = line;

    while !rest.is_empty() {
        if rest.starts_with('*') {
            let styled = MARKERS.iter().find_map(|(marker, style)| {
                let inner = rest.strip_prefix(marker)?;
                let end = inner.find(marker)?;
                (end > 0).then(|| (&inner[..end], *style, marker.len() * 2 + end))
            });
            match styled {
                Some((text, style, consumed)) => {
                    flush(&mut segments, &mut plain);
                    segments.push(TextSegment {
                        text: text.to_string(),
                        style,
                    });
                    rest = &rest[consumed..];
                }
                None => {
                    plain.push('*');
                    rest = &rest[1..];
                }
            }
            continue;
        }

        let end = rest.find('*').unwrap_or(rest.len());
        plain.push_str(&rest[..end]);
        rest = &rest[end..];
    }

    flush(&mut segments, &mut plain);
    segments
}

fn flush(segments: &mut Vec<TextSegment>, plain: &mut String) {
    if !plain.is_empty() {
        segments.push(TextSegment {
            text: std::mem::take(plain),
            style: TextStyle::Regular,
        });
    }
}

/// Groups a chapter body into blocks. Consecutive text lines form one
/// paragraph; blank lines separate paragraphs.
pub fn blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            push_paragraph(&mut blocks, &mut paragraph);
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            push_paragraph(&mut blocks, &mut paragraph);
            blocks.push(Block::Heading {
                level: caps[1].len() as u8,
                text: caps[2].to_string(),
            });
            continue;
        }

        if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("• ")) {
            push_paragraph(&mut blocks, &mut paragraph);
            blocks.push(Block::Bullet(item.trim().to_string()));
            continue;
        }

        paragraph.push(line);
    }

    push_paragraph(&mut blocks, &mut paragraph);
    blocks
}

fn push_paragraph(blocks: &mut Vec<Block>, lines: &mut Vec<&str>) {
    if !lines.is_empty() {
        blocks.push(Block::Paragraph(lines.join(" ")));
        lines.clear();
    }
}
