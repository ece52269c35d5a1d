use super::*;

#[test]
fn strip_tags_removes_simple_markup() {
    assert_eq!(strip_tags("<b>M 7.3</b>"), "M 7.3");
}

#[test]
fn strip_tags_removes_tags_with_attributes() {
    assert_eq!(
        strip_tags(r#"<a href="20210213.html" target="_blank">detail</a>"#),
        "detail"
    );
}

#[test]
fn strip_tags_is_non_greedy_across_tags() {
    assert_eq!(strip_tags("<td>a</td><td>b</td>"), "ab");
}

#[test]
fn strip_tags_keeps_text_and_entities() {
    assert_eq!(strip_tags("5&#43; <i>approx.</i>"), "5&#43; approx.");
}

#[test]
fn strip_tags_never_trims() {
    assert_eq!(strip_tags(" <span> padded </span> "), "  padded  ");
}

#[test]
fn drop_breaks_handles_all_br_spellings() {
    assert_eq!(drop_breaks("a<br>b<BR>c<br />d"), "abcd");
}

#[test]
fn breaks_become_newlines_for_info_text() {
    assert_eq!(breaks_to_newlines("line one<br>line two"), "line one\nline two");
}

#[test]
fn fix_glyphs_replaces_primes_and_mojibake() {
    assert_eq!(fix_glyphs("42°03′40″N"), "42°03'40\"N");
    assert_eq!(fix_glyphs("Lat\u{FFFD}@42°"), "Lat 42°");
    assert_eq!(fix_glyphs("1117 m;"), "1117 m");
}

#[test]
fn clean_lines_trims_each_line_and_keeps_blanks() {
    assert_eq!(clean_lines("  a  \n\n  b "), "a\n\nb");
}
