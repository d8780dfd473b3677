use crate::scan::lexer::{scan_line, Lexicon, ScanState};

/// Remove comments from `lines`, joining the result with `\n`.
///
/// Block comment state carries across lines. Literal content is copied
/// verbatim even when it contains comment markers. Each line contributes its
/// remaining code plus one newline, except a line that sits entirely inside a
/// block comment opened on an earlier line: it contributes nothing.
///
/// ```
/// use buildscript_injector::scan::strip_comments;
///
/// let stripped = strip_comments(["/* note", "still a note", "end */ code"]);
/// assert_eq!(stripped, "\n code\n");
/// ```
pub fn strip_comments<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    strip_comments_with(lines, &Lexicon::default())
}

pub fn strip_comments_with<I, S>(lines: I, lexicon: &Lexicon) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stripped = String::new();
    let mut state = ScanState::Code;

    for line in lines {
        let line = line.as_ref();
        let scan = scan_line(line, state, lexicon);
        state = scan.end_state;

        if scan.is_block_interior() {
            continue;
        }

        let mut cursor = 0;
        for segment in scan.segments.iter().filter(|s| s.kind.is_comment()) {
            stripped.push_str(&line[cursor..segment.range.start]);
            cursor = segment.range.end;
        }
        stripped.push_str(&line[cursor..]);
        stripped.push('\n');
    }

    stripped
}
