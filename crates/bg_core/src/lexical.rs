use regex::{Regex, RegexBuilder};

use crate::types::{KeywordDensity, LexicalStats};

/// Characters removed from the body before counting. This is a surface strip,
/// not a markdown parse: link syntax, tables and numbered lists survive it.
pub const MARKDOWN_MARKERS: &[char] = &['#', '_', '*', '>', '-', '`'];

pub fn strip_markdown(body: &str) -> String {
    body.chars().filter(|c| !MARKDOWN_MARKERS.contains(c)).collect()
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Builds the case-insensitive matcher for one keyword.
///
/// A word boundary is required on each side whose edge character is a word
/// character, so `seo` does not match inside `seos` while `c++` still matches
/// before a space. Returns `None` for a blank keyword.
fn keyword_matcher(keyword: &str) -> Option<Regex> {
    let keyword = keyword.trim();
    let first = keyword.chars().next()?;
    let last = keyword.chars().last()?;

    let mut pattern = String::new();
    if is_word_char(first) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(keyword));
    if is_word_char(last) {
        pattern.push_str(r"\b");
    }

    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("Could not build matcher for keyword {:?}: {}", keyword, e);
            None
        }
    }
}

pub fn count_keyword(text: &str, keyword: &str) -> usize {
    keyword_matcher(keyword)
        .map(|re| re.find_iter(text).count())
        .unwrap_or(0)
}

/// Occurrences as a percentage of `word_count`, rounded to two decimals and
/// clamped to `[0, 100]`. Zero words means zero density.
pub fn density(occurrences: usize, word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let percent = occurrences as f64 / word_count as f64 * 100.0;
    ((percent * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

/// Word count and per-keyword density of an article body.
pub fn analyze(body: &str, keywords: &[String]) -> LexicalStats {
    let plain = strip_markdown(body);
    let word_count = count_words(&plain);

    let keyword_density = keywords
        .iter()
        .map(|keyword| {
            let occurrences = count_keyword(&plain, keyword);
            KeywordDensity {
                keyword: keyword.clone(),
                occurrences,
                density: density(occurrences, word_count),
            }
        })
        .collect();

    LexicalStats {
        word_count,
        keyword_density,
    }
}
