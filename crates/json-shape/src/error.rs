//! Decode/encode error type.
//!
//! Every failure is attributed to the wire name of the field that produced
//! it. Errors raised inside a nested entity or a list element are wrapped in
//! `Nested`, so multi-level failures carry a full field path.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    /// A required key was absent at decode time.
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    /// A non-optional field's value was JSON `null`.
    #[error("field `{field}` may not be null")]
    NullNotAllowed { field: String },

    /// A coder received a JSON value of the wrong shape.
    #[error("field `{field}` expected {expected} but got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The JSON shape was right but domain parsing failed.
    #[error("field `{field}` is malformed: {reason}")]
    MalformedValue { field: String, reason: String },

    /// Encode-time: a non-optional field held no value.
    #[error("field `{field}` is required but holds no value")]
    InconsistentState { field: String },

    /// A declared validator rejected the decoded value.
    #[error("field `{field}` failed validation: {reason}")]
    ValidationFailed { field: String, reason: String },

    /// An error raised while de/encoding a nested entity or list element.
    #[error("in `{field}`: {source}")]
    Nested {
        field: String,
        #[source]
        source: Box<ShapeError>,
    },
}

impl ShapeError {
    /// Wraps an inner error with an outer field name.
    pub fn nest(field: impl Into<String>, source: ShapeError) -> Self {
        Self::Nested {
            field: field.into(),
            source: Box::new(source),
        }
    }

    /// The field name attributed at this level.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field }
            | Self::NullNotAllowed { field }
            | Self::TypeMismatch { field, .. }
            | Self::MalformedValue { field, .. }
            | Self::InconsistentState { field }
            | Self::ValidationFailed { field, .. }
            | Self::Nested { field, .. } => field,
        }
    }

    /// The full dotted/indexed path to the failing field.
    ///
    /// Examples: `"birthday"`, `"profile.birthday"`, `"tags[2].id"`.
    pub fn path(&self) -> String {
        match self {
            Self::Nested { field, source } => {
                let rest = source.path();
                if rest.starts_with('[') {
                    format!("{field}{rest}")
                } else {
                    format!("{field}.{rest}")
                }
            }
            _ => self.field().to_string(),
        }
    }
}
