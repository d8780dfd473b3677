use crate::scan::lexer::{Classification, Lexicon, Range, SegmentKind};
use crate::scan::literals::find_literals_with;

/// Every start offset of `needle` in `haystack`, overlapping matches included.
fn occurrences<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    let step = needle.chars().next().map_or(1, char::len_utf8);
    let mut from = 0;
    std::iter::from_fn(move || {
        if needle.is_empty() || from > haystack.len() {
            return None;
        }
        let idx = from + haystack[from..].find(needle)?;
        from = idx + step;
        Some(idx)
    })
}

/// `ranges` must be sorted and non-overlapping.
fn overlaps_any(ranges: &[Range], start: usize, end: usize) -> bool {
    let first = ranges.partition_point(|range| range.end <= start);
    ranges
        .get(first)
        .is_some_and(|range| range.intersects(start, end))
}

/// First offset of `needle` in `text` whose span lies outside every literal.
///
/// Returns `None` when every occurrence sits inside a string or char literal,
/// even though a plain substring search would succeed.
///
/// ```
/// use buildscript_injector::scan::index_of_outside_literals;
///
/// let line = r#"def website ="https://bitrise.io""#;
/// assert_eq!(index_of_outside_literals(line, "http"), None);
/// assert_eq!(index_of_outside_literals(line, "website"), Some(4));
/// ```
pub fn index_of_outside_literals(text: &str, needle: &str) -> Option<usize> {
    index_of_outside_literals_with(text, needle, &Lexicon::default())
}

pub fn index_of_outside_literals_with(text: &str, needle: &str, lexicon: &Lexicon) -> Option<usize> {
    let literals = find_literals_with(text, lexicon);
    occurrences(text, needle).find(|&start| !overlaps_any(&literals, start, start + needle.len()))
}

/// First offset of `needle` touching neither a literal nor a comment.
pub fn find_in_code(classification: &Classification, text: &str, needle: &str) -> Option<usize> {
    occurrences(text, needle)
        .find(|&start| !classification.touches(start, start + needle.len(), |_| true))
}

/// First offset of `needle` outside comments; literals are searched.
pub fn find_uncommented(classification: &Classification, text: &str, needle: &str) -> Option<usize> {
    occurrences(text, needle).find(|&start| {
        !classification.touches(start, start + needle.len(), SegmentKind::is_comment)
    })
}
