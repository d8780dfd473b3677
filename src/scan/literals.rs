use crate::scan::lexer::{Classification, Lexicon, Range};

/// Find the string and char literals of `text`, left to right.
///
/// Each range spans the opening through the closing quote. Quotes inside
/// comments do not open literals, and a quote with no partner on its line is
/// left out of the result.
pub fn find_literals(text: &str) -> Vec<Range> {
    find_literals_with(text, &Lexicon::default())
}

pub fn find_literals_with(text: &str, lexicon: &Lexicon) -> Vec<Range> {
    Classification::of(text, lexicon).literal_ranges()
}
