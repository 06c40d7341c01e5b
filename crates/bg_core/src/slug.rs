use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Slug used when a title has no ASCII alphanumerics left to work with.
pub const FALLBACK_SLUG: &str = "untitled-blog";

/// Turns a title into a lowercase, ASCII, hyphen-separated identifier.
///
/// Diacritics are removed by decomposing and dropping combining marks. Every
/// run of other non-alphanumeric characters becomes a single hyphen. The
/// result is idempotent: slugifying a slug returns it unchanged.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_title() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  10 Tips for   Better SEO  "), "10-tips-for-better-seo");
    }

    #[test]
    fn test_strips_diacritics() {
        assert_eq!(slugify("Café Crème à la Mode"), "cafe-creme-a-la-mode");
        assert_eq!(slugify("Über Straße"), "uber-stra-e");
    }

    #[test]
    fn test_collapses_separators_and_trims() {
        assert_eq!(slugify("--Rust -- & -- Go--"), "rust-go");
        assert_eq!(slugify("a_b*c"), "a-b-c");
    }

    #[test]
    fn test_idempotent() {
        for title in ["Hello, World!", "Café Crème", "SEO: 2024 Guide", "日本語 title"] {
            let once = slugify(title);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn test_no_alphanumerics_falls_back() {
        assert_eq!(slugify("!!!"), FALLBACK_SLUG);
        assert_eq!(slugify("日本語"), FALLBACK_SLUG);
        assert_eq!(slugify(""), FALLBACK_SLUG);
        assert_eq!(slugify(FALLBACK_SLUG), FALLBACK_SLUG);
    }
}
