/// Replacement rules applied to edge labels after the underscore-to-hyphen step, in order.
///
/// Every mounting suffix appears twice: as written in the graph (`_sig`) and as rewritten by the
/// hyphen step (`-sig`). Longer suffixes must stay ahead of the shorter ones they contain.
const SUFFIX_RULES: [(&str, &str); 10] = [
    ("_sigplus", ""),
    ("-sigplus", ""),
    ("_vert", ""),
    ("-vert", ""),
    ("_lum", ""),
    ("-lum", ""),
    ("_sig", ""),
    ("-sig", ""),
    ("_either", ""),
    ("-either", ""),
];

/// Map a raw edge endpoint label from the graph description to the pole id used in the pole table.
///
/// The steps are:
/// 1. unless the label starts with `_`, every `_` becomes `-`;
/// 2. mounting suffixes are removed wherever they occur (see [`SUFFIX_RULES`]);
/// 3. the remaining underscores are removed;
/// 4. surrounding whitespace is trimmed.
///
/// The result is only a lookup key. It is not guaranteed to name a known pole.
pub fn normalize_edge_name(raw_label: &str) -> String {
    let mut name = if raw_label.starts_with('_') {
        raw_label.to_string()
    } else {
        raw_label.replace('_', "-")
    };
    for (pattern, replacement) in SUFFIX_RULES {
        name = name.replace(pattern, replacement);
    }
    name.replace('_', "").trim().to_string()
}
