//! Lexical scanning of build-script text.
//!
//! The scanner classifies byte ranges into code, line comments, block
//! comments, string literals and char literals. It does not parse: there is
//! no AST and no escape handling, so a quote always closes the literal it
//! matches.

pub mod lexer;
pub mod literals;
pub mod search;
pub mod strip;

pub use lexer::{Classification, Lexicon, Range, ScanState, Segment, SegmentKind};
pub use literals::{find_literals, find_literals_with};
pub use search::{
    find_in_code, find_uncommented, index_of_outside_literals, index_of_outside_literals_with,
};
pub use strip::{strip_comments, strip_comments_with};
