//! Alias qualifiers (`t0.`) inside free-form SQL fragments.

use std::{collections::HashMap, ops::Range};

/// Alias of the table at `position` in the selection.
pub fn alias_for(position: usize) -> String {
    format!("t{position}")
}

pub(crate) fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Spans of identifiers directly followed by `.`, outside quoted strings.
///
/// `schema.t0.col` yields only `schema`: an identifier preceded by a dot
/// is a member, not a qualifier.
fn qualifier_spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut in_quote = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\'' {
            in_quote = !in_quote;
            i += 1;
            continue;
        }
        if in_quote || !is_word(b) {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && is_word(bytes[i]) {
            i += 1;
        }
        let member = start > 0 && bytes[start - 1] == b'.';
        if !member && bytes.get(i) == Some(&b'.') {
            spans.push(start..i);
        }
    }
    spans
}

/// Whether `text` qualifies anything with `alias`.
pub(crate) fn mentions_alias(text: &str, alias: &str) -> bool {
    qualifier_spans(text).into_iter().any(|span| &text[span] == alias)
}

/// Rewrite qualifiers through `mapping` in a single pass, so `t1 -> t0`
/// and `t2 -> t1` never chain.
pub(crate) fn remap_aliases(text: &str, mapping: &HashMap<String, String>) -> String {
    if mapping.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in qualifier_spans(text) {
        if let Some(new) = mapping.get(&text[span.clone()]) {
            out.push_str(&text[last..span.start]);
            out.push_str(new);
            last = span.end;
        }
    }
    out.push_str(&text[last..]);
    out
}
