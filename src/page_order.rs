//! Natural page ordering for image filenames.
//!
//! Scanned comic pages are usually named with an embedded page number
//! (`page2.jpg`, `007.jpeg`, `scan_10.jpg`) but rarely zero-padded
//! consistently, so lexicographic order puts `page10` before `page2`.
//! The ordering here compares the first run of decimal digits in the
//! filename stem numerically and only falls back to byte order.

use std::cmp::Ordering;
use std::path::Path;

/// Extract the numeric page hint from a filename stem.
///
/// The hint is the first run of decimal digits, parsed as an integer.
/// Stems without digits (and runs that overflow `u64`) sort after every
/// numbered stem.
pub fn page_hint(stem: &str) -> u64 {
    let run: String = stem
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if run.is_empty() {
        return u64::MAX;
    }
    run.parse().unwrap_or(u64::MAX)
}

/// Compare two filename stems in natural page order.
///
/// Numeric hints compare first; ties (including two hint-less stems)
/// fall back to lexicographic stem comparison, giving a stable total
/// order independent of zero-padding width.
pub fn compare_stems(lhs: &str, rhs: &str) -> Ordering {
    page_hint(lhs)
        .cmp(&page_hint(rhs))
        .then_with(|| lhs.cmp(rhs))
}

/// Compare two paths by the natural order of their filename stems.
pub fn compare_paths(lhs: &Path, rhs: &Path) -> Ordering {
    compare_stems(&stem_of(lhs), &stem_of(rhs))
}

/// Filename stem as a string, empty when the path has none.
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
