//! `{{key}}` template rendering with dot-filler column alignment.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Total visual width of "key + filler + value" on a rendered line.
pub const COLUMN_WIDTH: usize = 64;

/// Fixed padding subtracted from the column width before filling.
pub const VALUE_PADDING: usize = 5;

const FILLER: char = '.';

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

fn placeholder_re() -> &'static Regex {
    PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{\{([^{}]*)\}\}").unwrap())
}

/// Replace every `{{key}}` in `template` with a filler run followed by the
/// key's value from `stats`.
///
/// The key is whitespace-trimmed before lookup; a key absent from `stats`
/// renders as the literal `N/A`. The filler run is sized so that
/// `len(key) + len(filler) + len(value)` equals
/// `COLUMN_WIDTH - VALUE_PADDING`, clamped at zero.
///
/// Pure and deterministic; performs no I/O.
pub fn render(template: &str, stats: &BTreeMap<String, String>) -> String {
    placeholder_re()
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let key = caps[1].trim();
            let value = stats.get(key).map(String::as_str).unwrap_or("N/A");
            let filler = (COLUMN_WIDTH - VALUE_PADDING)
                .saturating_sub(key.len())
                .saturating_sub(value.len());
            format!("{}{}", FILLER.to_string().repeat(filler), value)
        })
        .into_owned()
}
