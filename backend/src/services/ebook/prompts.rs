use crate::llm::ChatRequest;
use common::model::ebook::EbookOutline;

const OUTLINE_TOKENS: u32 = 2048;
const CONTENT_TOKENS: u32 = 12000;

const SYSTEM: &str = "Você é um especialista em marketing de conteúdo que escreve ebooks \
educativos para agências digitais brasileiras. Responda sempre em português do Brasil e \
somente com um objeto JSON válido, sem texto antes ou depois.";

pub fn outline(title: &str) -> ChatRequest {
    let user = format!(
        "Crie a estrutura de um ebook com o título \"{}\".\n\
         Responda com um JSON no formato:\n\
         {{\"title\": string, \"subtitle\": string, \"targetAudience\": string, \
         \"objectives\": [string], \"chapters\": [{{\"title\": string, \"summary\": string}}]}}\n\
         Use entre 5 e 8 capítulos, cada um com um resumo de duas ou três frases, e de 3 a 5 objetivos.",
        title.trim()
    );
    ChatRequest::json(SYSTEM, user).with_max_tokens(OUTLINE_TOKENS)
}

pub fn content(title: &str, outline: &EbookOutline) -> ChatRequest {
    let mut chapters = String::new();
    for (idx, chapter) in outline.chapters.iter().enumerate() {
        chapters.push_str(&format!("{}. {}", idx + 1, chapter.title));
        if !chapter.summary.trim().is_empty() {
            chapters.push_str(&format!(": {}", chapter.summary.trim()));
        }
        chapters.push('\n');
    }
    let user = format!(
        "Escreva o conteúdo completo do ebook \"{}\".\n\
         Público-alvo: {}.\n\
         Objetivos: {}.\n\
         Capítulos aprovados:\n{}\
         Escreva cada capítulo com 600 a 900 palavras, usando markdown leve \
         (subtítulos com ##, listas com -, **negrito**).\n\
         Responda com um JSON no formato: \
         {{\"chapters\": [{{\"title\": string, \"content\": string}}]}}, \
         mantendo a ordem e os títulos dos capítulos.",
        title.trim(),
        if outline.target_audience.trim().is_empty() {
            "profissionais de marketing"
        } else {
            outline.target_audience.trim()
        },
        outline.objectives.join("; "),
        chapters,
    );
    ChatRequest::json(SYSTEM, user).with_max_tokens(CONTENT_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::ebook::OutlineChapter;

    #[test]
    fn outline_asks_for_json() {
        let chat = outline("  Marketing no Instagram ");
        assert!(chat.json_response);
        assert!(chat.user.contains("\"Marketing no Instagram\""));
        assert!(chat.user.contains("\"targetAudience\""));
    }

    #[test]
    fn content_lists_the_approved_chapters() {
        let outline = EbookOutline {
            title: "Funis".to_string(),
            subtitle: None,
            target_audience: String::new(),
            objectives: vec!["Captar".to_string(), "Converter".to_string()],
            chapters: vec![
                OutlineChapter {
                    title: "Topo".to_string(),
                    summary: "Atração".to_string(),
                },
                OutlineChapter {
                    title: "Fundo".to_string(),
                    summary: " ".to_string(),
                },
            ],
        };
        let chat = content("Funis de venda", &outline);
        assert!(chat.user.contains("1. Topo: Atração\n2. Fundo\n"));
        assert!(chat.user.contains("Objetivos: Captar; Converter."));
        assert!(chat.user.contains("profissionais de marketing"));
        assert_eq!(chat.max_tokens, Some(CONTENT_TOKENS));
    }
}
