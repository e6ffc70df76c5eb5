//! Search-key folding shared by the index side and the query side.
//!
//! NFKC turns full-width Latin letters and digits into their ASCII forms, so
//! `ＢＵＲＧＥＲ` and `burger` fold to the same key.

use unicode_normalization::UnicodeNormalization;

/// Width- and case-folds `text` for substring matching
pub fn fold(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Folded, trimmed query; `None` when nothing is left to match on
pub fn fold_query(query: &str) -> Option<String> {
    let folded = fold(query.trim());
    let folded = folded.trim();
    if folded.is_empty() {
        None
    } else {
        Some(folded.to_string())
    }
}
