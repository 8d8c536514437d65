use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Clean a raw field value.
///
/// Carriage returns and HTML-like tags are removed first. A value that still
/// contains a newline is a line-delimited list: each line is trimmed and the
/// line structure kept. Any other value is prose: whitespace runs collapse to
/// single spaces and the ends are trimmed.
pub fn normalize(raw: &str) -> String {
    let without_cr = raw.replace('\r', "");
    let value = TAG_RE.replace_all(&without_cr, "");

    if value.contains('\n') {
        value.split('\n').map(str::trim).collect::<Vec<_>>().join("\n")
    } else {
        value.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
