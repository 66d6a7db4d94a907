use crate::{accessor::AccessError, validate::ValidationError};
use derive_more::Display;
use thiserror::Error as ThisError;

///
/// Error
///
/// Every failure the runtime can surface. None are retried; each one
/// aborts the operation that raised it.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Access(#[from] AccessError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Schema(_) => ErrorClass::Configuration,
            Self::Validation(err) => err.class(),
            Self::Access(_) => ErrorClass::Misuse,
        }
    }

    /// Only user validation failures are safe to show an end user verbatim.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self.class(), ErrorClass::UserValidation)
    }
}

impl From<classprop_schema::Error> for Error {
    fn from(err: classprop_schema::Error) -> Self {
        Self::Schema(SchemaError::Build(err))
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorClass {
    /// Malformed or missing schema metadata; a defect, not user input.
    #[display("configuration")]
    Configuration,

    /// A rule received a value of the wrong basic kind.
    #[display("internal_validation")]
    InternalValidation,

    /// A well-typed value violated a declared constraint.
    #[display("user_validation")]
    UserValidation,

    /// Unknown property, permission violation, type mismatch, unset read.
    #[display("misuse")]
    Misuse,
}

///
/// SchemaError
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error(transparent)]
    Build(classprop_schema::Error),

    #[error("type '{0}' is not registered")]
    UnknownType(String),

    #[error("type '{0}' does not have a valid identifier")]
    NoIdentifier(String),

    #[error("type '{path}' cannot be instantiated: {reason}")]
    NotInstantiable { path: String, reason: &'static str },

    #[error("type '{path}' is not a descendant of '{ancestor}'")]
    NotDescendant { path: String, ancestor: String },

    #[error("invalid type list on '{property}': {source}")]
    InvalidTypes {
        property: String,
        source: classprop_schema::types::TypeTokenError,
    },

    #[error("invalid value {value:?} for @{tag} on '{property}': {reason}")]
    InvalidTagValue {
        property: String,
        tag: String,
        value: Option<String>,
        reason: String,
    },

    #[error("could not get default value for '{property}' of type {types}")]
    NoDefault { property: String, types: String },

    #[error("accessor override targets unknown type '{0}'")]
    UnknownOverrideType(String),

    #[error("property extension failed for '{property}': {message}")]
    Extension { property: String, message: String },
}

impl SchemaError {
    pub(crate) fn invalid_tag(
        property: &str,
        tag: &str,
        value: Option<&str>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidTagValue {
            property: property.to_string(),
            tag: tag.to_string(),
            value: value.map(ToString::to_string),
            reason: reason.into(),
        }
    }
}
