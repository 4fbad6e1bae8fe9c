//! Automatic module names synthesized from archive file names.
//!
//! The rules run in a fixed order; reordering them changes results
//! (`lib-1.0` must lose its version before punctuation becomes dots).

use regex::Regex;
use std::sync::LazyLock;

/// `-<digits>` followed by a dot or the end of the name.
static VERSION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-([0-9]+(\.|$))").expect("static pattern"));

/// Trailing run of dots and digits led by a dot (`..2024`, `.1.2`).
static TRAILING_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[0-9.]*$").expect("static pattern"));

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").expect("static pattern"));

static REPEATED_DOTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{2,}").expect("static pattern"));

/// Derive an automatic module name from an archive base name (no extension).
///
/// Returns `None` when nothing is left after normalization.
pub fn derive_automatic_name(base_name: &str) -> Option<String> {
    let mut name = match VERSION_SUFFIX.find(base_name) {
        Some(m) => &base_name[..m.start()],
        None => base_name,
    };
    if let Some(m) = TRAILING_VERSION.find(name) {
        name = &name[..m.start()];
    }

    let dotted = NON_ALPHANUMERIC.replace_all(name, ".");
    let collapsed = REPEATED_DOTS.replace_all(&dotted, ".");

    let mut result: &str = &collapsed;
    result = result.strip_prefix('.').unwrap_or(result);
    result = result.strip_suffix('.').unwrap_or(result);

    if result.is_empty() {
        None
    } else {
        Some(result.to_string())
    }
}
