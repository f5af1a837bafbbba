use crate::constants::MAX_SPARSE_GAP;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotMapping,
    NotNested,
    SparseOverflow,
    EmptyContainer,
    NotValidated,
    InvalidKey,
    Deserialize,
}

impl ErrorKind {
    /// Failures the validity check reports through its boolean result unless
    /// the caller asks for them to be raised.
    pub fn is_validation(self) -> bool {
        matches!(self, ErrorKind::NotMapping | ErrorKind::NotNested)
    }

    /// Failures that always abort a decode; the payload is malformed.
    pub fn is_structural(self) -> bool {
        matches!(self, ErrorKind::SparseOverflow | ErrorKind::EmptyContainer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub key: Option<String>,
}

impl Error {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            key: None,
        }
    }

    pub fn not_mapping() -> Self {
        Self::new(ErrorKind::NotMapping, "`data` is not a map type")
    }

    pub fn not_nested() -> Self {
        Self::new(ErrorKind::NotNested, "`data` is not a nested type")
    }

    pub fn sparse_overflow(gap: usize) -> Self {
        Self::new(
            ErrorKind::SparseOverflow,
            format!("too many consecutive empty array slots: gap of {gap} exceeds {MAX_SPARSE_GAP}"),
        )
    }

    pub fn empty_container() -> Self {
        Self::new(ErrorKind::EmptyContainer, "unexpected empty container")
    }

    pub fn not_validated() -> Self {
        Self::new(
            ErrorKind::NotValidated,
            "`is_nested()` has to succeed before accessing `data`",
        )
    }

    pub fn invalid_key(key: &str) -> Self {
        Self::new(ErrorKind::InvalidKey, format!("cannot split key `{key}`")).with_key(key)
    }

    pub fn deserialize(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Deserialize, message)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}
