//! Contains the error types for both directions of conversion.
//!
//! [`DecodeError`] is produced when turning NBT into a document,
//! [`EncodeError`] when turning a document (including its JSON or YAML text)
//! into NBT. Both carry a description of the stage that failed and the lower
//! level cause, if any. Errors raised deep inside a tree are wrapped once per
//! enclosing tag, so the message reads as a path to the offending value:
//!
//! ```text
//! error decoding nbt: reading compound "Level": reading list "Sections": reading list item 3: reading byte: unexpected end of input
//! ```
use std::fmt::Display;

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Error converting NBT data into a document.
#[derive(Debug)]
pub struct DecodeError {
    stage: String,
    kind: DecodeErrorKind,
    source: Option<Cause>,
}

/// The root cause of a [`DecodeError`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// Any other errors. Users should not match on this variant and should
    /// instead use a wildcard `_`. Errors in this category may be moved to new variants.
    Other,

    /// The input ended part way through a tag. Often a sign of the wrong byte
    /// order, or of data that is still compressed.
    UnexpectedEof,

    /// A tag type byte outside 0 to 12.
    InvalidTag(u8),

    /// A negative length, or one that cannot fit in the remaining input.
    InvalidLength,

    /// Expected unicode data but was not valid. Contained bytes are the
    /// invalid data.
    Nonunicode(Vec<u8>),

    /// Compounds and lists nested deeper than [`MAX_DEPTH`][crate::MAX_DEPTH].
    DepthLimit,
}

/// Convenience type for Result.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

impl DecodeError {
    /// Get the kind of error. For wrapped errors this is the kind of the
    /// innermost error.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Description of the step that failed.
    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Wrap this error in an outer stage, keeping its kind.
    pub fn within(self, stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            kind: self.kind.clone(),
            source: Some(Box::new(self)),
        }
    }

    pub(crate) fn new(stage: impl Into<String>, kind: DecodeErrorKind) -> Self {
        Self {
            stage: stage.into(),
            kind,
            source: None,
        }
    }

    pub(crate) fn bespoke(stage: impl Into<String>) -> Self {
        Self::new(stage, DecodeErrorKind::Other)
    }

    pub(crate) fn other(stage: impl Into<String>, e: impl Into<Cause>) -> Self {
        Self {
            stage: stage.into(),
            kind: DecodeErrorKind::Other,
            source: Some(e.into()),
        }
    }

    pub(crate) fn io(stage: impl Into<String>, e: std::io::Error) -> Self {
        match e.kind() {
            // The io message for this is about buffers, which means little
            // to someone looking at a truncated file.
            std::io::ErrorKind::UnexpectedEof => Self::new(
                format!("{}: unexpected end of input", stage.into()),
                DecodeErrorKind::UnexpectedEof,
            ),
            _ => Self {
                stage: stage.into(),
                kind: DecodeErrorKind::Other,
                source: Some(Box::new(e)),
            },
        }
    }

    pub(crate) fn invalid_tag(tag: u8) -> Self {
        Self::new(
            format!("invalid tag type {}", tag),
            DecodeErrorKind::InvalidTag(tag),
        )
    }

    pub(crate) fn invalid_length(stage: impl Into<String>) -> Self {
        Self::new(stage, DecodeErrorKind::InvalidLength)
    }

    pub(crate) fn nonunicode(stage: impl Into<String>, data: Vec<u8>, e: impl Into<Cause>) -> Self {
        Self {
            stage: format!(
                "{}: invalid string, non-unicode: {}",
                stage.into(),
                String::from_utf8_lossy(&data)
            ),
            kind: DecodeErrorKind::Nonunicode(data),
            source: Some(e.into()),
        }
    }

    pub(crate) fn depth_limit() -> Self {
        Self::new(
            format!("nesting deeper than {} levels", crate::MAX_DEPTH),
            DecodeErrorKind::DepthLimit,
        )
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("error decoding nbt: ")?;
        write_chain(f, &self.stage, self.source.as_deref())
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(e: std::io::Error) -> Self {
        DecodeError::io("io error", e)
    }
}

/// Error converting a document into NBT data.
#[derive(Debug)]
pub struct EncodeError {
    stage: String,
    kind: EncodeErrorKind,
    source: Option<Cause>,
}

/// The root cause of an [`EncodeError`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeErrorKind {
    /// Any other errors. Users should not match on this variant and should
    /// instead use a wildcard `_`. Errors in this category may be moved to new variants.
    Other,

    /// The JSON or YAML text could not be parsed at all.
    Syntax,

    /// A required field such as `tagType` or `name` is absent.
    MissingField,

    /// A field holds the wrong kind of value, eg a string where a number
    /// belongs, or a compound value that is not an array.
    WrongType,

    /// A number does not fit the width of its tag type.
    OutOfRange,

    /// A `tagType` or `tagListType` outside 0 to 12.
    InvalidTag,

    /// A name, string, array or list too long for its length prefix.
    LengthOverflow,

    /// Compounds and lists nested deeper than [`MAX_DEPTH`][crate::MAX_DEPTH].
    DepthLimit,

    /// The output could not be written.
    Io,
}

/// Convenience type for Result.
pub type EncodeResult<T> = std::result::Result<T, EncodeError>;

impl EncodeError {
    /// Get the kind of error. For wrapped errors this is the kind of the
    /// innermost error.
    pub fn kind(&self) -> &EncodeErrorKind {
        &self.kind
    }

    /// Description of the step that failed.
    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Wrap this error in an outer stage, keeping its kind.
    pub fn within(self, stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            kind: self.kind.clone(),
            source: Some(Box::new(self)),
        }
    }

    pub(crate) fn new(stage: impl Into<String>, kind: EncodeErrorKind) -> Self {
        Self {
            stage: stage.into(),
            kind,
            source: None,
        }
    }

    pub(crate) fn syntax(stage: impl Into<String>, e: impl Into<Cause>) -> Self {
        Self {
            stage: stage.into(),
            kind: EncodeErrorKind::Syntax,
            source: Some(e.into()),
        }
    }

    pub(crate) fn missing_field(field: &str) -> Self {
        Self::new(
            format!("missing field `{}`", field),
            EncodeErrorKind::MissingField,
        )
    }

    pub(crate) fn wrong_type(expected: &str, found: &serde_json::Value) -> Self {
        Self::new(
            format!("expected {}, found {}", expected, describe(found)),
            EncodeErrorKind::WrongType,
        )
    }

    pub(crate) fn out_of_range(what: &str, value: impl Display) -> Self {
        Self::new(
            format!("{} out of range for {}", value, what),
            EncodeErrorKind::OutOfRange,
        )
    }

    pub(crate) fn invalid_tag(value: impl Display) -> Self {
        Self::new(
            format!("tag type {} is not recognized", value),
            EncodeErrorKind::InvalidTag,
        )
    }

    pub(crate) fn length_overflow(what: &str, len: usize) -> Self {
        Self::new(
            format!("{} of length {} is too long", what, len),
            EncodeErrorKind::LengthOverflow,
        )
    }

    pub(crate) fn depth_limit() -> Self {
        Self::new(
            format!("nesting deeper than {} levels", crate::MAX_DEPTH),
            EncodeErrorKind::DepthLimit,
        )
    }

    pub(crate) fn io(stage: impl Into<String>, e: std::io::Error) -> Self {
        Self {
            stage: stage.into(),
            kind: EncodeErrorKind::Io,
            source: Some(Box::new(e)),
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("error encoding nbt: ")?;
        write_chain(f, &self.stage, self.source.as_deref())
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(e: std::io::Error) -> Self {
        EncodeError::io("io error", e)
    }
}

// Our own wrapped errors print only their stage, so the prefix appears once
// at the front of the chain.
fn write_chain(
    f: &mut std::fmt::Formatter<'_>,
    stage: &str,
    mut source: Option<&(dyn std::error::Error + Send + Sync + 'static)>,
) -> std::fmt::Result {
    f.write_str(stage)?;
    while let Some(e) = source {
        if let Some(inner) = e.downcast_ref::<DecodeError>() {
            write!(f, ": {}", inner.stage)?;
            source = inner.source.as_deref();
        } else if let Some(inner) = e.downcast_ref::<EncodeError>() {
            write!(f, ": {}", inner.stage)?;
            source = inner.source.as_deref();
        } else {
            write!(f, ": {}", e)?;
            source = None;
        }
    }
    Ok(())
}

fn describe(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
