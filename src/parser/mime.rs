//! MIME type helpers: content-type inference, filename extensions and pattern matching.

/// Generic binary type used when nothing more specific is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Determine the effective content type of an attachment.
///
/// - `.eml` files are `message/rfc822`, whatever type was declared.
/// - A declared type that is non-empty and not the generic
///   `application/octet-stream` is kept as-is.
/// - A declared `text/plain` is trusted without consulting the extension.
/// - Otherwise the extension is looked up in the `mime_guess` table.
/// - Unknown types fall back to `application/octet-stream`.
///
/// The result is always lowercase.
pub fn infer_mime_type(filename: &str, declared: &str) -> String {
    let declared = declared.trim();
    let extension = filename_extension(filename);
    if extension == "eml" {
        return "message/rfc822".to_string();
    }

    if is_specific_mime_type(declared) && !declared.eq_ignore_ascii_case("text/plain") {
        return declared.to_lowercase();
    }

    if declared.eq_ignore_ascii_case("text/plain") {
        return "text/plain".to_string();
    }

    if !extension.is_empty() {
        if let Some(guess) = mime_guess::from_ext(&extension).first_raw() {
            return guess.to_lowercase();
        }
    }

    OCTET_STREAM.to_string()
}

/// `true` if `mime_type` is present and more specific than `application/octet-stream`.
fn is_specific_mime_type(mime_type: &str) -> bool {
    !mime_type.is_empty() && !mime_type.eq_ignore_ascii_case(OCTET_STREAM)
}

/// Extract the lowercase extension of a filename.
///
/// Returns the text after the last `.`, or an empty string when there is no
/// dot, the name ends with a dot, or the only dot starts the name (`.profile`).
pub fn filename_extension(filename: &str) -> String {
    match filename.rfind('.') {
        Some(pos) if pos > 0 && pos < filename.len() - 1 => filename[pos + 1..].to_lowercase(),
        _ => String::new(),
    }
}

/// Check `mime_type` against a list of patterns (e.g. `"image/*"`, `"*/*"`).
///
/// Matching is case-insensitive; `*` matches any run of characters.
pub fn mime_type_matches(mime_type: &str, patterns: &[String]) -> bool {
    let mime_type = mime_type.to_ascii_lowercase();
    patterns
        .iter()
        .any(|p| wildcard_match(p.trim().to_ascii_lowercase().as_bytes(), mime_type.as_bytes()))
}

/// Glob match supporting only `*`, with single-star backtracking.
fn wildcard_match(pattern: &[u8], text: &[u8]) -> bool {
    let (mut p, mut t) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((sp, st)) = star {
            // Let the last star swallow one more character
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&b| b == b'*')
}
