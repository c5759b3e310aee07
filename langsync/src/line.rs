//! Line-level grammar of an Android `strings.xml` file.
//!
//! The sync engine never builds a document tree. Instead each physical line
//! is labelled with a [`LineKind`] by [`classify`], a pure function of the
//! trimmed line and the [`ClassifierState`] carried over from the previous
//! line. The only cross-line construct the grammar understands is a
//! multi-line `<!-- ... -->` comment; everything else must fit on one line
//! to be recognised.

use std::fmt;

pub const COMMENT_OPEN: &str = "<!--";
pub const COMMENT_CLOSE: &str = "-->";
pub const ARRAY_OPEN: &str = "<string-array";
pub const ARRAY_CLOSE: &str = "</string-array>";
pub const ITEM_OPEN: &str = "<item";
pub const ITEM_CLOSE: &str = "</item>";
pub const ENTRY_OPEN: &str = "<string";
pub const ENTRY_CLOSE: &str = "</string>";

/// Semantic kind of one physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// A single-line `<string name="...">...</string>`.
    Entry,
    /// Part of a comment, single or multi-line.
    Comment,
    /// Opening `<string-array ...>` tag.
    ArrayBegin,
    /// Closing `</string-array>` tag.
    ArrayEnd,
    /// A single-line `<item>...</item>`.
    ArrayItem,
    /// Empty after trimming.
    Blank,
    /// Anything else: root tags, the XML declaration, multi-line markup.
    Other,
}

impl LineKind {
    /// Number of indent levels the merge writes in front of a line of this kind.
    pub fn indent_depth(self) -> usize {
        match self {
            LineKind::Entry | LineKind::Comment | LineKind::ArrayEnd => 1,
            LineKind::ArrayItem => 2,
            LineKind::ArrayBegin | LineKind::Blank | LineKind::Other => 0,
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineKind::Entry => "entry",
            LineKind::Comment => "comment",
            LineKind::ArrayBegin => "array-begin",
            LineKind::ArrayEnd => "array-end",
            LineKind::ArrayItem => "array-item",
            LineKind::Blank => "blank",
            LineKind::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// State threaded between successive [`classify`] calls within one file scan.
///
/// Start every file with `ClassifierState::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassifierState {
    pub in_comment: bool,
}

/// Classifies a line, returning its kind and the state for the next line.
///
/// `line` is trimmed before matching; rules are applied in fixed precedence
/// and the first one that matches wins.
pub fn classify(line: &str, state: ClassifierState) -> (LineKind, ClassifierState) {
    let line = line.trim();

    // Inside a span every line is a comment; outside, only an opener starts one.
    if state.in_comment || line.starts_with(COMMENT_OPEN) {
        let in_comment = !line.ends_with(COMMENT_CLOSE);
        return (LineKind::Comment, ClassifierState { in_comment });
    }

    let kind = if line.starts_with(ARRAY_OPEN) {
        LineKind::ArrayBegin
    } else if line.ends_with(ARRAY_CLOSE) {
        LineKind::ArrayEnd
    } else if line.starts_with(ITEM_OPEN) && line.ends_with(ITEM_CLOSE) {
        LineKind::ArrayItem
    } else if line.starts_with(ENTRY_OPEN) && line.ends_with(ENTRY_CLOSE) {
        LineKind::Entry
    } else if line.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Other
    };
    (kind, state)
}

/// Extracts the key of an entry line: the text between its first two `"`.
///
/// Returns `None` when the line does not contain a complete quote pair.
pub fn entry_key(line: &str) -> Option<&str> {
    let mut parts = line.split('"');
    parts.next()?;
    let key = parts.next()?;
    // A lone quote yields a second part but no third one.
    parts.next()?;
    Some(key)
}
