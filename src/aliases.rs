//! Encoding-name fixup applied before a converter is opened.
//!
//! Some `iconv` implementations know "UTF-8" but not "UTF8". The names
//! handled here are rewritten to their hyphenated forms; anything else
//! passes through untouched.

/// Map common unhyphenated UTF names to the form the system primitive knows.
///
/// The `UTF` prefix and the `LE`/`BE` suffix are matched case-insensitively,
/// the digits exactly.
pub fn fix_encoding_name(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() < 4 || !bytes[..3].eq_ignore_ascii_case(b"UTF") || bytes[3] == b'-' {
        return name;
    }

    let rest = &name[3..];
    let fixed = match rest.as_bytes()[0] {
        b'1' => match_suffix(&rest[1..], "6", ["UTF-16", "UTF-16LE", "UTF-16BE"]),
        b'3' => match_suffix(&rest[1..], "2", ["UTF-32", "UTF-32LE", "UTF-32BE"]),
        b'7' if rest.len() == 1 => Some("UTF-7"),
        b'8' if rest.len() == 1 => Some("UTF-8"),
        _ => None,
    };
    fixed.unwrap_or(name)
}

fn match_suffix(s: &str, digit: &str, names: [&'static str; 3]) -> Option<&'static str> {
    let tail = s.strip_prefix(digit)?;
    if tail.is_empty() {
        Some(names[0])
    } else if tail.eq_ignore_ascii_case("LE") {
        Some(names[1])
    } else if tail.eq_ignore_ascii_case("BE") {
        Some(names[2])
    } else {
        None
    }
}
