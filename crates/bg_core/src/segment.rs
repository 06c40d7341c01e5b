use std::sync::OnceLock;

use regex::Regex;

use crate::config::PipelineConfig;
use crate::types::ParsedArticle;

fn heading_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#+\s*").expect("heading regex must compile"))
}

/// Splits generated text into title, meta description and body.
///
/// Blank lines are dropped. The first remaining line is the title, the second
/// the meta description, and the rest are joined with blank lines to form the
/// body. Missing parts fall back to `config.fallback_title` and a description
/// built from the keywords, so this never fails.
pub fn segment(raw: &str, keywords: &[String], config: &PipelineConfig) -> ParsedArticle {
    let mut lines = raw.lines().map(str::trim).filter(|l| !l.is_empty());

    let title = lines
        .next()
        .map(|l| heading_marker_re().replace(l, "").trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| {
            tracing::warn!("Generated text has no title line, using fallback");
            config.fallback_title.clone()
        });

    let meta_description = match lines.next() {
        Some(line) => line.chars().take(config.meta_max_chars()).collect(),
        None => fallback_description(keywords),
    };

    let body = lines.collect::<Vec<_>>().join("\n\n");

    ParsedArticle {
        title,
        meta_description,
        body,
    }
}

pub fn fallback_description(keywords: &[String]) -> String {
    format!("An article about {}", keywords.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        vec!["rust".to_string(), "seo".to_string()]
    }

    #[test]
    fn test_empty_input_uses_fallbacks() {
        let parsed = segment("", &keywords(), &PipelineConfig::default());
        assert_eq!(parsed.title, "Untitled Blog");
        assert_eq!(parsed.meta_description, "An article about rust, seo");
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn test_whitespace_only_input_uses_fallbacks() {
        let parsed = segment("  \n\t\n   \n", &keywords(), &PipelineConfig::default());
        assert_eq!(parsed.title, "Untitled Blog");
        assert_eq!(parsed.meta_description, "An article about rust, seo");
        assert!(parsed.body.is_empty());
    }

    #[test]
    fn test_splits_title_meta_and_body() {
        let raw = "# Rust for SEO\n\nA short description.\n\n\
                   ## Intro\nFirst paragraph.\n\n\nSecond paragraph.";
        let parsed = segment(raw, &keywords(), &PipelineConfig::default());
        assert_eq!(parsed.title, "Rust for SEO");
        assert_eq!(parsed.meta_description, "A short description.");
        assert_eq!(parsed.body, "## Intro\n\nFirst paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_strips_heading_run() {
        let parsed = segment("### Deep Title", &[], &PipelineConfig::default());
        assert_eq!(parsed.title, "Deep Title");
        assert_eq!(parsed.meta_description, "An article about ");
    }

    #[test]
    fn test_heading_marker_only_falls_back() {
        let parsed = segment("##\nmeta", &[], &PipelineConfig::default());
        assert_eq!(parsed.title, "Untitled Blog");
        assert_eq!(parsed.meta_description, "meta");
    }

    #[test]
    fn test_meta_description_is_truncated_to_160_chars() {
        let long_meta = "é".repeat(200);
        let raw = format!("Title\n{}\nBody", long_meta);
        let parsed = segment(&raw, &[], &PipelineConfig::default());
        assert_eq!(parsed.meta_description.chars().count(), 160);
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn test_meta_truncation_follows_scoring_policy() {
        let mut config = PipelineConfig::default();
        config.scoring.meta_max_chars = 10;
        let parsed = segment("Title\nA fairly long meta line\nBody", &[], &config);
        assert_eq!(parsed.meta_description, "A fairly l");
    }

    #[test]
    fn test_handles_crlf_line_endings() {
        let parsed = segment("Title\r\nMeta\r\n\r\nBody line\r\n", &[], &PipelineConfig::default());
        assert_eq!(parsed.title, "Title");
        assert_eq!(parsed.meta_description, "Meta");
        assert_eq!(parsed.body, "Body line");
    }
}
