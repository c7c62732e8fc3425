//! Filename hint from the URL path.

use url::Url;

/// Last non-empty path segment of `url`, percent-decoded.
///
/// Returns `None` for root paths and for `.`/`..` segments.
pub fn last_path_segment(url: &Url) -> Option<String> {
    let raw = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let decoded = percent_decode(raw);
    if decoded.is_empty() || decoded == "." || decoded == ".." {
        return None;
    }
    Some(decoded)
}

/// Decodes `%XX` escapes; malformed escapes are kept literally and invalid
/// UTF-8 is replaced.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escaped = input
                .get(i + 1..i + 3)
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            if let Some(b) = escaped {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
