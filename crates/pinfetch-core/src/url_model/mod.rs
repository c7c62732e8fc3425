//! Default destination filenames for URLs given without an explicit name.
//!
//! The queue writes whatever filename it is handed; these helpers only exist
//! so front ends can pick a reasonable one.

mod path;
mod sanitize;

pub use path::last_path_segment;
pub use sanitize::sanitize_filename;

use url::Url;

/// Used when the URL path has no usable last segment.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Derives a filename from the last path segment of `url`, sanitized.
///
/// - `https://github.com/o/r/releases/download/1.0/app.zip` → `app.zip`
/// - `https://github.com/` → `download.bin`
pub fn derive_filename(url: &Url) -> String {
    last_path_segment(url)
        .map(|s| sanitize_filename(&s))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}
