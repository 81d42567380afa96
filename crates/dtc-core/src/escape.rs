//! Escaping of description text for C string literals

/// Escape double quotes so the text can sit inside a string literal.
///
/// Used as-is for delimited exports.
pub fn escape_quotes(text: &str) -> String {
    text.replace('"', r#"\""#)
}

/// Escape text taken from an annotated export's string tables.
///
/// On top of quote escaping this collapses quotes that were already escaped in
/// the source (`\\"` back to `\"`) and turns the `\A` typo found in the vendor
/// strings into `\nA`.
pub fn escape_annotated(text: &str) -> String {
    escape_quotes(text)
        .replace(r#"\\""#, r#"\""#)
        .replace(r"\A", r"\nA")
}
