pub const KEYWORDS: &[&str] = &["null", "true", "false"];

/// Largest number of null slots a single write may pad onto an array.
pub const MAX_SPARSE_GAP: usize = 1000;

/// Key used for an anonymous list root once the accumulator already holds entries.
pub const ANONYMOUS_KEY: &str = "";

pub const EMPTY_LIST_LITERAL: &str = "[]";

pub const EMPTY_MAP_LITERAL: &str = "{}";

pub(crate) const SEGMENT_OPEN: u8 = b'[';

pub(crate) const SEGMENT_CLOSE: u8 = b']';

#[inline]
pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

#[inline]
pub fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}
