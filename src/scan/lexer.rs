//! Line-oriented lexical state machine shared by every scanning primitive.
//!
//! A line is scanned starting from the state carried over from the previous
//! line and yields the non-code [`Segment`]s it contains. Only
//! [`ScanState::Code`] and [`ScanState::InBlockComment`] survive a line
//! boundary; literals must close on the line they open on.

use serde::Deserialize;

/// Half-open `[start, end)` byte span.
///
/// For literals the span includes both quote delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range {
    /// Starting byte offset (inclusive)
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

impl Range {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `[start, end)` shares at least one byte with this range.
    pub const fn intersects(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }

    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    const fn shifted(self, by: usize) -> Self {
        Self::new(self.start + by, self.end + by)
    }
}

/// Classification of the scanner's cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanState {
    #[default]
    Code,
    InLineComment,
    InBlockComment,
    InStringLiteral,
    InCharLiteral,
}

impl ScanState {
    /// The state the next line starts in when `self` held at the end of a line.
    pub const fn carried_over(self) -> ScanState {
        match self {
            ScanState::InBlockComment => ScanState::InBlockComment,
            _ => ScanState::Code,
        }
    }
}

/// Kind of a non-code span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    LineComment,
    BlockComment,
    StringLiteral,
    CharLiteral,
}

impl SegmentKind {
    pub const fn is_comment(self) -> bool {
        matches!(self, SegmentKind::LineComment | SegmentKind::BlockComment)
    }

    pub const fn is_literal(self) -> bool {
        matches!(self, SegmentKind::StringLiteral | SegmentKind::CharLiteral)
    }
}

/// A non-code span of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub kind: SegmentKind,
    pub range: Range,
}

impl Segment {
    const fn new(kind: SegmentKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            range: Range::new(start, end),
        }
    }
}

/// Comment markers and quote characters of a C-family build-script dialect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Lexicon {
    pub line_comment: String,
    pub block_open: String,
    pub block_close: String,
    pub string_quote: char,
    pub char_quote: char,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            line_comment: "//".to_string(),
            block_open: "/*".to_string(),
            block_close: "*/".to_string(),
            string_quote: '"',
            char_quote: '\'',
        }
    }
}

impl Lexicon {
    fn literal_state(&self, ch: char) -> Option<ScanState> {
        if ch == self.string_quote {
            Some(ScanState::InStringLiteral)
        } else if ch == self.char_quote {
            Some(ScanState::InCharLiteral)
        } else {
            None
        }
    }

    fn literal_kind(&self, state: ScanState) -> Option<(char, SegmentKind)> {
        match state {
            ScanState::InStringLiteral => Some((self.string_quote, SegmentKind::StringLiteral)),
            ScanState::InCharLiteral => Some((self.char_quote, SegmentKind::CharLiteral)),
            _ => None,
        }
    }
}

/// Outcome of scanning a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineScan {
    /// Non-code spans, offsets relative to the line start
    pub segments: Vec<Segment>,
    /// State handed to the next line
    pub end_state: ScanState,
    /// The line began inside a block comment opened on an earlier line
    pub started_in_block: bool,
    /// At least one block comment closed on this line
    pub closed_block: bool,
}

impl LineScan {
    /// A continuation line of a block comment that does not close here.
    pub fn is_block_interior(&self) -> bool {
        self.started_in_block && !self.closed_block
    }
}

/// Scan one line (without its terminator) starting from `carry`.
pub(crate) fn scan_line(line: &str, carry: ScanState, lexicon: &Lexicon) -> LineScan {
    let mut state = carry.carried_over();
    let started_in_block = state == ScanState::InBlockComment;
    let mut closed_block = false;
    let mut segments = Vec::new();
    let mut segment_start = 0;
    let mut pos = 0;

    while pos < line.len() {
        let rest = &line[pos..];
        match state {
            ScanState::Code => {
                if rest.starts_with(lexicon.line_comment.as_str()) {
                    state = ScanState::InLineComment;
                    segment_start = pos;
                    pos = line.len();
                } else if rest.starts_with(lexicon.block_open.as_str()) {
                    state = ScanState::InBlockComment;
                    segment_start = pos;
                    pos += lexicon.block_open.len();
                } else {
                    let Some(ch) = rest.chars().next() else {
                        break;
                    };
                    let width = ch.len_utf8();
                    // A quote only opens a literal when it closes on this line.
                    if let Some(literal) = lexicon.literal_state(ch) {
                        if rest[width..].contains(ch) {
                            state = literal;
                            segment_start = pos;
                        }
                    }
                    pos += width;
                }
            }
            ScanState::InLineComment => pos = line.len(),
            ScanState::InBlockComment => match rest.find(lexicon.block_close.as_str()) {
                Some(idx) => {
                    pos += idx + lexicon.block_close.len();
                    segments.push(Segment::new(SegmentKind::BlockComment, segment_start, pos));
                    closed_block = true;
                    state = ScanState::Code;
                }
                None => pos = line.len(),
            },
            ScanState::InStringLiteral | ScanState::InCharLiteral => {
                let Some((quote, kind)) = lexicon.literal_kind(state) else {
                    break;
                };
                match rest.find(quote) {
                    Some(idx) => {
                        pos += idx + quote.len_utf8();
                        segments.push(Segment::new(kind, segment_start, pos));
                        state = ScanState::Code;
                    }
                    None => pos = line.len(),
                }
            }
        }
    }

    match state {
        ScanState::InLineComment => {
            segments.push(Segment::new(SegmentKind::LineComment, segment_start, line.len()));
        }
        ScanState::InBlockComment => {
            segments.push(Segment::new(SegmentKind::BlockComment, segment_start, line.len()));
        }
        _ => {}
    }

    LineScan {
        segments,
        end_state: state.carried_over(),
        started_in_block,
        closed_block,
    }
}

/// Every comment and literal span of a text, in the text's own offsets.
///
/// A block comment spanning several lines is reported as one segment that
/// includes the line terminators it covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    segments: Vec<Segment>,
    end_state: ScanState,
}

impl Classification {
    pub fn of(text: &str, lexicon: &Lexicon) -> Self {
        let mut segments: Vec<Segment> = Vec::new();
        let mut state = ScanState::Code;
        let mut offset = 0;

        for line in text.split('\n') {
            let scan = scan_line(line, state, lexicon);
            let mut line_segments = scan.segments.into_iter().map(|segment| Segment {
                kind: segment.kind,
                range: segment.range.shifted(offset),
            });

            if scan.started_in_block {
                if let (Some(first), Some(previous)) = (line_segments.next(), segments.last_mut()) {
                    previous.range.end = first.range.end;
                }
            }
            segments.extend(line_segments);

            state = scan.end_state;
            offset += line.len() + 1;
        }

        if state == ScanState::InBlockComment {
            tracing::warn!("unterminated block comment runs to end of input");
        }
        tracing::trace!(segments = segments.len(), "classified text");
        Self {
            segments,
            end_state: state,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// State at end of input; `InBlockComment` for an unterminated block comment.
    pub fn end_state(&self) -> ScanState {
        self.end_state
    }

    pub fn literal_ranges(&self) -> Vec<Range> {
        self.segments
            .iter()
            .filter(|segment| segment.kind.is_literal())
            .map(|segment| segment.range)
            .collect()
    }

    /// Whether `[start, end)` overlaps a segment whose kind `reject` accepts.
    pub fn touches(&self, start: usize, end: usize, reject: impl Fn(SegmentKind) -> bool) -> bool {
        let first = self.segments.partition_point(|segment| segment.range.end <= start);
        self.segments[first..]
            .iter()
            .take_while(|segment| segment.range.start < end)
            .any(|segment| reject(segment.kind) && segment.range.intersects(start, end))
    }
}
