//! CSS declaration extraction.
//!
//! This is a `property: value;` scanner, not a CSS parser: nested rules,
//! at-rules, shorthand expansion, and selector semantics are out of scope.
//! Malformed fragments are skipped silently; only well-formed pairs reach
//! the resolution engine.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z-]+)\s*:\s*([^;\n{}]+);").unwrap());

/// One extracted declaration with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub line: usize,
}

/// Extract all `property: value;` declarations from a stylesheet.
///
/// Restartable and side-effect free: repeated calls over the same text
/// yield the same declarations in source order.
pub fn extract_declarations(text: &str) -> Vec<Declaration> {
    let clean = strip_comments(text);
    let mut declarations = Vec::new();

    for captures in DECL_RE.captures_iter(&clean) {
        let property = captures[1].trim();
        let value = captures[2].trim();
        if property.is_empty() || value.is_empty() {
            continue;
        }

        let offset = captures.get(0).map(|m| m.start()).unwrap_or(0);
        let line = clean[..offset].bytes().filter(|&b| b == b'\n').count() + 1;

        declarations.push(Declaration {
            property: property.to_string(),
            value: value.to_string(),
            line,
        });
    }

    declarations
}

/// Blank out `/* ... */` comments, preserving newlines so line numbers in
/// the remaining text stay accurate. An unterminated comment runs to the
/// end of input.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        let comment = &rest[start..];
        let end = comment.find("*/").map(|i| i + 2).unwrap_or(comment.len());
        for c in comment[..end].chars() {
            out.push(if c == '\n' { '\n' } else { ' ' });
        }
        rest = &comment[end..];
    }

    out.push_str(rest);
    out
}
