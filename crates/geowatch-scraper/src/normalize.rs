//! Text cleanup for fragments lifted out of bulletin pages.
//!
//! The pages carry markup remnants, a handful of consistently mis-encoded
//! glyphs, and layout-driven whitespace. Cleanup is deliberately dumb: one
//! non-greedy tag-removal pass, a fixed substitution table, per-line trims.
//! Nothing here trims the final result — callers own that.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid br regex"));

/// Removes all `<tag>`-shaped substrings in a single pass. Does not parse
/// nested structure and does not decode entities.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// Deletes `<br>` tags outright. Used for the volcano metadata text, where
/// the logical line structure comes from the source's own newlines.
#[must_use]
pub fn drop_breaks(html: &str) -> String {
    BREAK.replace_all(html, "").into_owned()
}

/// Converts `<br>` tags to newlines. Used for alert info text, where the
/// breaks are the only line structure there is.
#[must_use]
pub fn breaks_to_newlines(html: &str) -> String {
    BREAK.replace_all(html, "\n").into_owned()
}

/// Substitutes the known mis-encoded glyphs: prime marks become ASCII
/// quotes, the `\u{FFFD}@` mojibake pair becomes a space, stray semicolons
/// are dropped.
#[must_use]
pub fn fix_glyphs(text: &str) -> String {
    text.replace('′', "'")
        .replace('″', "\"")
        .replace("\u{FFFD}@", " ")
        .replace(';', "")
}

/// Trims every line and rejoins with `\n`, preserving blank lines so
/// paragraph splits survive.
#[must_use]
pub fn clean_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
