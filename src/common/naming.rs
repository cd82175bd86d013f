use regex::Regex;
use std::sync::LazyLock;

pub const MAX_BASE_NAME_LEN: usize = 80;

static DISALLOWED_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\-]+").expect("valid regex"));
static UNDERSCORE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").expect("valid regex"));

/// Turns untrusted text into a file name component made of `[A-Za-z0-9_.-]`,
/// at most 80 characters long. Returns `fallback` when nothing usable is left.
pub fn safe_base_name(input: Option<&str>, fallback: &str) -> String {
    let replaced = DISALLOWED_RUN.replace_all(input.unwrap_or_default(), "_");
    let collapsed = UNDERSCORE_RUN.replace_all(&replaced, "_");

    // Only ASCII survives the replacement, so byte truncation is char-safe.
    let mut cleaned = collapsed.trim_matches('_').to_string();
    cleaned.truncate(MAX_BASE_NAME_LEN);

    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}
