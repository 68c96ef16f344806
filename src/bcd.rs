//! Mapping from CSS declarations to BCD-style compatibility keys.
//!
//! Compatibility data is indexed by dotted paths such as
//! `css.properties.display` or `css.properties.display.grid`. The mapping
//! is purely textual; value normalization happens only where keys are
//! compared (see `matcher`).

/// Compatibility key for a property: `css.properties.<prop>`.
pub fn property_key(property: &str) -> String {
    format!("css.properties.{}", property)
}

/// Compatibility key for a property/value pair:
/// `css.properties.<prop>.<value>`. The value is passed through verbatim.
pub fn value_key(property: &str, value: &str) -> String {
    format!("{}.{}", property_key(property), value)
}

/// Lowercase a value and collapse runs of non-alphanumeric characters to a
/// single `-`, with no leading or trailing separator.
pub fn normalize_token(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_sep = false;
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}
