//! URL-safe identifiers derived from free text.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

fn disallowed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s-]").expect("static regex"))
}

fn separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-\s]+").expect("static regex"))
}

/// Convert `value` to a slug.
///
/// The text is decomposed (NFKD) and reduced to ASCII, so accented letters
/// keep their base letter. Anything that is not a letter, digit, underscore,
/// hyphen or whitespace is dropped, the rest is lowercased, runs of hyphens
/// and whitespace collapse into a single hyphen, and leading or trailing
/// hyphens and underscores are stripped.
///
/// ```
/// use blog_schema::slug::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Crème brûlée  "), "creme-brulee");
/// ```
pub fn slugify(value: &str) -> String {
    let ascii: String = value.nfkd().filter(char::is_ascii).collect();
    let cleaned = disallowed().replace_all(&ascii, "").to_lowercase();
    separators()
        .replace_all(&cleaned, "-")
        .trim_matches(|c| c == '-' || c == '_')
        .to_owned()
}

/// The slug a post carries after being saved with `slug` and `title`.
///
/// An empty slug is filled from the title. A slug that is not literally the
/// title is then recomputed from the title as well, which in practice means
/// the slug is always `slugify(title)` and a hand-written slug never survives
/// a save. The only slug kept verbatim is one spelled exactly like the title.
pub fn on_save(slug: &str, title: &str) -> String {
    let mut slug = slug.to_owned();
    if slug.is_empty() {
        slug = slugify(title);
    }
    if slug != title {
        slug = slugify(title);
    }
    slug
}
