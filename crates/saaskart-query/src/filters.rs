// SPDX-License-Identifier: Apache-2.0

use saaskart_model::{Category, CompanyMetrics, CompanySummary};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// One search row: the company without its description, its metrics record
/// and its categories ordered by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyRecord {
    pub company: CompanySummary,
    pub metrics: CompanyMetrics,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchResponse {
    pub companies: Vec<CompanyRecord>,
}

/// Escapes `LIKE` wildcards with `!` so user text only ever matches
/// literally. Pair with `ESCAPE '!'`.
#[must_use]
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            '!' | '%' | '_' => {
                out.push('!');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// NFKC-normalises and trims a free-text term, truncating it to `max_chars`
/// characters. Blank input yields `None`.
#[must_use]
pub fn normalize_text_term(input: &str, max_chars: usize) -> Option<String> {
    let normalized: String = input.nfkc().collect();
    let truncated: String = normalized.trim().chars().take(max_chars).collect();
    let term = truncated.trim_end();
    if term.is_empty() {
        None
    } else {
        Some(term.to_string())
    }
}

/// Case-insensitive substring test with the semantics of SQLite `LIKE`:
/// ASCII letters fold, everything else compares exactly.
#[must_use]
pub fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}
