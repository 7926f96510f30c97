/// Collapse every run of whitespace (including newlines and page joins) into a
/// single space and trim both ends. Field heuristics run on this form.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
