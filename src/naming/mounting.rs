use super::SUFFIX_TOKENS;

/// Mounting style encoded in the last `_`-delimited segment of a raw edge label, e.g. `sig` for
/// `P_12_sig`. Returns an empty string if the label carries no known mounting suffix.
///
/// Works on the raw label. Normalization strips the same suffixes, so this has to run first.
pub fn mounting_style(raw_label: &str) -> String {
    match raw_label.rsplit_once('_') {
        Some((_, segment)) if SUFFIX_TOKENS.contains(&segment) => segment.to_string(),
        _ => String::new(),
    }
}
