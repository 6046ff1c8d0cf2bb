// Natural page ordering tests.

use std::cmp::Ordering;
use std::path::Path;

use comic_convert::page_order::{compare_paths, compare_stems, page_hint};

#[test]
fn test_page_hint_extracts_first_digit_run() {
    assert_eq!(page_hint("page12"), 12);
    assert_eq!(page_hint("007_cover"), 7);
    assert_eq!(page_hint("scan_3_of_20"), 3);
}

#[test]
fn test_page_hint_without_digits_is_max() {
    assert_eq!(page_hint("cover"), u64::MAX);
    assert_eq!(page_hint(""), u64::MAX);
}

#[test]
fn test_page_hint_overflow_is_max() {
    assert_eq!(page_hint("99999999999999999999999"), u64::MAX);
}

#[test]
fn test_numeric_ordering_beats_lexicographic() {
    let mut names = vec!["page2.jpg", "page10.jpg", "page1.jpg"];
    names.sort_by(|a, b| compare_paths(Path::new(a), Path::new(b)));
    assert_eq!(names, vec!["page1.jpg", "page2.jpg", "page10.jpg"]);
}

#[test]
fn test_zero_padding_is_irrelevant() {
    let mut names = vec!["010", "2", "0001"];
    names.sort_by(|a, b| compare_stems(a, b));
    assert_eq!(names, vec!["0001", "2", "010"]);
}

#[test]
fn test_unnumbered_stems_sort_last() {
    let mut names = vec!["cover", "page1", "back"];
    names.sort_by(|a, b| compare_stems(a, b));
    assert_eq!(names, vec!["page1", "back", "cover"]);
}

#[test]
fn test_equal_hints_tie_break_lexicographically() {
    assert_eq!(compare_stems("a5", "b5"), Ordering::Less);
    assert_eq!(compare_stems("b5", "a5"), Ordering::Greater);
    assert_eq!(compare_stems("a5", "a5"), Ordering::Equal);
}
