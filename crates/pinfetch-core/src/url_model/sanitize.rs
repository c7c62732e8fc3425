//! Filename sanitization for names derived from URLs.

/// Longest name most filesystems accept, in bytes.
const NAME_MAX: usize = 255;

/// Makes a URL-derived name safe to join onto the download directory.
///
/// Path separators, NUL, control characters and whitespace become `_`
/// (runs collapse to one). Leading/trailing dots and underscores are trimmed
/// so the result can never be `.`, `..` or hidden, and the name is cut to
/// 255 bytes on a char boundary.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let unsafe_char = matches!(c, '/' | '\\' | '\0') || c.is_control() || c.is_whitespace();
        if !unsafe_char {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }

    let mut trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.len() > NAME_MAX {
        let mut cut = NAME_MAX;
        while !trimmed.is_char_boundary(cut) {
            cut -= 1;
        }
        trimmed = &trimmed[..cut];
    }
    trimmed.to_string()
}
