//! Legacy field-name rewriting for output format strings.
//!
//! Older templates refer to `.Id` and `.Image`; records expose `ID` and
//! `ImageID`. Only whole top-level field references are rewritten, so
//! `.Identity`, `.ImageName` or `.Config.Image` pass through untouched.

/// Legacy name -> canonical name, applied in order.
pub const FIELD_ALIASES: &[(&str, &str)] = &[("Id", "ID"), ("Image", "ImageID")];

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Rewrite legacy field references in a format string.
pub fn normalize_format(format: &str) -> String {
    FIELD_ALIASES
        .iter()
        .fold(format.to_string(), |acc, (legacy, canonical)| {
            replace_field(&acc, legacy, canonical)
        })
}

/// Replace `.{legacy}` with `.{canonical}` wherever it forms a complete
/// top-level field reference.
fn replace_field(input: &str, legacy: &str, canonical: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev: Option<char> = None;
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        if c == '.' && !prev.is_some_and(is_word_char) {
            let after_dot = &rest[1..];
            if let Some(tail) = after_dot.strip_prefix(legacy) {
                if !tail.chars().next().is_some_and(is_word_char) {
                    out.push('.');
                    out.push_str(canonical);
                    prev = canonical.chars().last();
                    rest = tail;
                    continue;
                }
            }
        }
        out.push(c);
        prev = Some(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}
