use serde::Deserialize;

/// Options controlling which empty values survive decoding.
///
/// Both switches apply uniformly to every entry value after special literals
/// (`"null"`, `"true"`, `"[]"`, ...) have been replaced.
///
/// # Examples
/// ```
/// use nested_form::DecodeOptions;
///
/// let opts = DecodeOptions::new().with_allow_blank(false).with_allow_empty(true);
/// assert!(!opts.allow_blank);
/// assert!(opts.allow_empty);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Keep empty strings as values. When `false` they decode to null.
    pub allow_blank: bool,
    /// Keep empty arrays and objects as values. When `false` they decode to null.
    pub allow_empty: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = allow_blank;
        self
    }

    pub fn with_allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            allow_blank: true,
            allow_empty: false,
        }
    }
}
