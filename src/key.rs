//! Bracket-notation key grammar.
//!
//! ```text
//! key       := namespace? segment+
//! namespace := word-char+
//! segment   := '[' content ']'
//! ```
//!
//! `content` may be empty and may not contain brackets. A key that does not
//! match in full is a plain key and is stored verbatim.

use memchr::memchr;
use smallvec::SmallVec;

use crate::constants::{is_word_char, SEGMENT_CLOSE, SEGMENT_OPEN};
use crate::{Error, Result};

pub type RawSegments<'a> = SmallVec<[&'a str; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Index,
    EmptyList,
    Dict,
}

impl SegmentKind {
    pub fn is_list(self) -> bool {
        matches!(self, SegmentKind::Index | SegmentKind::EmptyList)
    }
}

/// Address of a slot inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    Index(usize),
    Key(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Index(usize),
    Append,
    Name(&'a str),
}

impl<'a> Segment<'a> {
    fn from_raw(raw: &'a str) -> Self {
        match (segment_kind(raw), index_of(raw)) {
            (SegmentKind::EmptyList, _) => Segment::Append,
            (_, Slot::Index(index)) => Segment::Index(index),
            (_, Slot::Key(name)) => Segment::Name(name),
        }
    }

    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Index(_) => SegmentKind::Index,
            Segment::Append => SegmentKind::EmptyList,
            Segment::Name(_) => SegmentKind::Dict,
        }
    }

    /// `[]` addresses slot zero; the array grows from there.
    pub fn slot(&self) -> Slot<'a> {
        match *self {
            Segment::Index(index) => Slot::Index(index),
            Segment::Append => Slot::Index(0),
            Segment::Name(name) => Slot::Key(name),
        }
    }
}

/// A key split into its namespace and typed segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath<'a> {
    pub namespace: Option<&'a str>,
    pub segments: SmallVec<[Segment<'a>; 8]>,
}

impl<'a> KeyPath<'a> {
    /// Returns `None` for plain keys: no bracket segment, or anything outside
    /// the grammar such as `a-b[0]` or `a[0]x`.
    pub fn parse(key: &'a str) -> Option<Self> {
        let namespace = namespace_of(key);
        let raw = lex_segments(strip_namespace(key))?;
        if raw.is_empty() {
            return None;
        }
        let segments = raw.into_iter().map(Segment::from_raw).collect();
        Some(Self {
            namespace,
            segments,
        })
    }

    pub fn is_nested(&self) -> bool {
        match self.namespace {
            Some(_) => !self.segments.is_empty(),
            None => self.segments.len() >= 2,
        }
    }

    pub fn first_kind(&self) -> Option<SegmentKind> {
        self.segments.first().map(Segment::kind)
    }
}

pub fn is_nested(key: &str) -> bool {
    KeyPath::parse(key).is_some_and(|path| path.is_nested())
}

pub fn namespace_of(key: &str) -> Option<&str> {
    for (idx, ch) in key.char_indices() {
        if ch == '[' {
            return (idx > 0).then(|| &key[..idx]);
        }
        if !is_word_char(ch) {
            return None;
        }
    }
    None
}

pub fn strip_namespace(key: &str) -> &str {
    match namespace_of(key) {
        Some(namespace) => &key[namespace.len()..],
        None => key,
    }
}

/// Splits a key (namespace excluded) into bracket segments that keep their
/// brackets, e.g. `item[a][0]` → `["[a]", "[0]"]`.
pub fn split(key: &str) -> Result<RawSegments<'_>> {
    let rest = strip_namespace(key);
    match lex_segments(rest) {
        Some(segments) if !segments.is_empty() || key.is_empty() => Ok(segments),
        _ => Err(Error::invalid_key(key)),
    }
}

pub fn segment_kind(segment: &str) -> SegmentKind {
    let content = strip_brackets(segment);
    if content.is_empty() {
        SegmentKind::EmptyList
    } else if content.bytes().all(|b| b.is_ascii_digit()) {
        SegmentKind::Index
    } else {
        SegmentKind::Dict
    }
}

pub fn index_of(segment: &str) -> Slot<'_> {
    let content = strip_brackets(segment);
    match segment_kind(segment) {
        SegmentKind::Index => Slot::Index(parse_index(content)),
        SegmentKind::EmptyList => Slot::Index(0),
        SegmentKind::Dict => Slot::Key(content),
    }
}

pub fn strip_brackets(segment: &str) -> &str {
    let segment = segment.strip_prefix('[').unwrap_or(segment);
    segment.strip_suffix(']').unwrap_or(segment)
}

// Saturates so an absurd index trips the sparse gap limit instead of wrapping.
fn parse_index(digits: &str) -> usize {
    digits.bytes().fold(0usize, |acc, b| {
        acc.saturating_mul(10).saturating_add(usize::from(b - b'0'))
    })
}

fn lex_segments(input: &str) -> Option<RawSegments<'_>> {
    let bytes = input.as_bytes();
    let mut segments = RawSegments::new();
    let mut pos = 0;
    while pos < bytes.len() {
        if bytes[pos] != SEGMENT_OPEN {
            return None;
        }
        let content_start = pos + 1;
        let close = content_start + memchr(SEGMENT_CLOSE, &bytes[content_start..])?;
        if memchr(SEGMENT_OPEN, &bytes[content_start..close]).is_some() {
            return None;
        }
        segments.push(&input[pos..=close]);
        pos = close + 1;
    }
    Some(segments)
}
