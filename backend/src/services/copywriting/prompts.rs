//! Prompt templates for the copy generators. Output language is pt-BR.

use crate::llm::ChatRequest;
use common::model::content::AdPlatform;
use common::requests::{AdRequest, BlogRequest, InstagramRequest, WhatsappRequest};

pub const DEFAULT_HASHTAGS: u8 = 10;
pub const DEFAULT_WORD_COUNT: u32 = 800;
pub const DEFAULT_VARIATIONS: u8 = 3;

const SYSTEM: &str = "Você é um redator publicitário sênior de uma agência de marketing digital \
brasileira. Escreva sempre em português do Brasil, com linguagem clara, persuasiva e adequada \
ao canal. Não invente dados, preços ou depoimentos.";

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

pub fn instagram(req: &InstagramRequest) -> ChatRequest {
    let hashtags = req.hashtags.unwrap_or(DEFAULT_HASHTAGS);
    let mut prompt = format!(
        "Crie uma legenda para um post no Instagram sobre: {}.\n\
         Tom de voz: {}.\n\
         Público-alvo: {}.\n",
        req.topic.trim(),
        or_default(&req.tone, "descontraído e próximo"),
        or_default(&req.audience, "seguidores da marca"),
    );
    match req.call_to_action.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(cta) => prompt.push_str(&format!("Termine com esta chamada para ação: {}.\n", cta)),
        None => prompt.push_str("Termine com uma chamada para ação curta.\n"),
    }
    if hashtags == 0 {
        prompt.push_str("Não use hashtags.\n");
    } else {
        prompt.push_str(&format!(
            "Inclua exatamente {} hashtags relevantes no final.\n",
            hashtags
        ));
    }
    prompt.push_str("Use emojis com moderação e parágrafos curtos.");
    ChatRequest::text(SYSTEM, prompt)
}

pub fn blog(req: &BlogRequest) -> ChatRequest {
    let word_count = req.word_count.unwrap_or(DEFAULT_WORD_COUNT);
    let mut prompt = format!(
        "Escreva um artigo de blog otimizado para SEO sobre: {}.\n\
         Extensão aproximada: {} palavras.\n\
         Tom de voz: {}.\n",
        req.topic.trim(),
        word_count,
        or_default(&req.tone, "informativo e profissional"),
    );
    let keywords: Vec<&str> = req
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if !keywords.is_empty() {
        prompt.push_str(&format!(
            "Use naturalmente as palavras-chave: {}.\n",
            keywords.join(", ")
        ));
    }
    prompt.push_str(
        "Estruture em markdown: título com #, introdução, seções com ## e uma conclusão \
         com chamada para ação.",
    );
    let max_tokens = (word_count * 2).clamp(1024, 8192);
    ChatRequest::text(SYSTEM, prompt).with_max_tokens(max_tokens)
}

pub fn whatsapp(req: &WhatsappRequest) -> ChatRequest {
    let prompt = format!(
        "Crie um roteiro de mensagens de WhatsApp para vender: {}.\n\
         Objetivo da conversa: {}.\n\
         Público-alvo: {}.\n\
         Tom de voz: {}.\n\
         Divida em: abordagem inicial, apresentação da oferta, resposta a objeções comuns \
         e fechamento. Mensagens curtas, como numa conversa real.",
        req.product.trim(),
        req.objective.trim(),
        or_default(&req.audience, "clientes em potencial"),
        or_default(&req.tone, "cordial e direto"),
    );
    ChatRequest::text(SYSTEM, prompt)
}

fn platform_rules(platform: AdPlatform) -> &'static str {
    match platform {
        AdPlatform::Facebook => {
            "Facebook Ads: título até 40 caracteres, texto principal até 125 caracteres, descrição até 30 caracteres."
        }
        AdPlatform::Instagram => {
            "Instagram Ads: texto principal até 125 caracteres, visual e direto, com emojis pontuais."
        }
        AdPlatform::Google => {
            "Google Ads (rede de pesquisa): títulos até 30 caracteres e descrições até 90 caracteres."
        }
        AdPlatform::Linkedin => {
            "LinkedIn Ads: tom profissional, texto introdutório até 150 caracteres e título até 70 caracteres."
        }
    }
}

pub fn ad(req: &AdRequest) -> ChatRequest {
    let variations = req.variations.unwrap_or(DEFAULT_VARIATIONS);
    let prompt = format!(
        "Crie {} variações de anúncio para: {}.\n\
         Objetivo da campanha: {}.\n\
         Público-alvo: {}.\n\
         Regras da plataforma: {}\n\
         Numere as variações e destaque título, texto e chamada para ação de cada uma.",
        variations,
        req.product.trim(),
        req.objective.trim(),
        or_default(&req.audience, "público amplo interessado no produto"),
        platform_rules(req.platform),
    );
    ChatRequest::text(SYSTEM, prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instagram_defaults_and_cta() {
        let req = InstagramRequest {
            topic: " Lançamento de café especial ".to_string(),
            tone: None,
            audience: Some("  ".to_string()),
            hashtags: None,
            call_to_action: Some("Peça já pelo link da bio".to_string()),
        };
        let chat = instagram(&req);
        assert!(!chat.json_response);
        assert!(chat.user.contains("sobre: Lançamento de café especial."));
        assert!(chat.user.contains("seguidores da marca"));
        assert!(chat.user.contains("exatamente 10 hashtags"));
        assert!(chat.user.contains("Peça já pelo link da bio"));
    }

    #[test]
    fn instagram_without_hashtags() {
        let req = InstagramRequest {
            topic: "Promoção".to_string(),
            tone: Some("urgente".to_string()),
            audience: None,
            hashtags: Some(0),
            call_to_action: None,
        };
        let chat = instagram(&req);
        assert!(chat.user.contains("Não use hashtags"));
        assert!(chat.user.contains("Tom de voz: urgente."));
    }

    #[test]
    fn blog_lists_keywords_and_scales_tokens() {
        let req = BlogRequest {
            topic: "Tráfego pago".to_string(),
            keywords: vec!["google ads".to_string(), " ".to_string(), "cpc".to_string()],
            tone: None,
            word_count: Some(3000),
        };
        let chat = blog(&req);
        assert!(chat.user.contains("palavras-chave: google ads, cpc."));
        assert!(chat.user.contains("3000 palavras"));
        assert_eq!(chat.max_tokens, Some(6000));
    }

    #[test]
    fn ad_includes_platform_limits() {
        let req = AdRequest {
            product: "Curso de fotografia".to_string(),
            platform: AdPlatform::Google,
            objective: "gerar leads".to_string(),
            audience: None,
            variations: None,
        };
        let chat = ad(&req);
        assert!(chat.user.starts_with("Crie 3 variações"));
        assert!(chat.user.contains("títulos até 30 caracteres"));
    }

    #[test]
    fn whatsapp_mentions_objective() {
        let req = WhatsappRequest {
            product: "Plano de consultoria".to_string(),
            objective: "agendar uma reunião".to_string(),
            audience: None,
            tone: None,
        };
        let chat = whatsapp(&req);
        assert!(chat.user.contains("Objetivo da conversa: agendar uma reunião."));
        assert_eq!(chat.system, SYSTEM);
    }
}
