use classprop_config::ConfigError;
use classprop_core::{
    accessor::AccessError,
    error::{Error as CoreError, SchemaError},
    validate::ValidationError,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// Only user validation failures carry a message meant for end users.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Validation(ValidationErrorKind::User)
        )
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Schema(err) => err.into(),
            CoreError::Validation(err) => err.into(),
            CoreError::Access(err) => err.into(),
        }
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        let (kind, origin) = match &err {
            SchemaError::Build(_) => (SchemaErrorKind::Invalid, ErrorOrigin::Schema),
            SchemaError::InvalidTypes { .. } => (SchemaErrorKind::Invalid, ErrorOrigin::Catalog),
            SchemaError::UnknownType(_) => (SchemaErrorKind::UnknownType, ErrorOrigin::Catalog),
            SchemaError::UnknownOverrideType(_) => {
                (SchemaErrorKind::UnknownType, ErrorOrigin::Accessor)
            }
            SchemaError::NoIdentifier(_) => (SchemaErrorKind::NoIdentifier, ErrorOrigin::Identity),
            SchemaError::NotDescendant { .. } => {
                (SchemaErrorKind::NotDescendant, ErrorOrigin::Identity)
            }
            SchemaError::NotInstantiable { .. } => {
                (SchemaErrorKind::NotInstantiable, ErrorOrigin::Catalog)
            }
            SchemaError::InvalidTagValue { .. } => {
                (SchemaErrorKind::InvalidTag, ErrorOrigin::Validation)
            }
            SchemaError::NoDefault { .. } => (SchemaErrorKind::NoDefault, ErrorOrigin::Defaults),
            SchemaError::Extension { .. } => (SchemaErrorKind::Extension, ErrorOrigin::Catalog),
        };

        Self::new(ErrorKind::Schema(kind), origin, err.to_string())
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        let kind = match err {
            ValidationError::Internal { .. } => ValidationErrorKind::Internal,
            ValidationError::User { .. } => ValidationErrorKind::User,
        };

        Self::new(
            ErrorKind::Validation(kind),
            ErrorOrigin::Validation,
            err.to_string(),
        )
    }
}

impl From<AccessError> for Error {
    fn from(err: AccessError) -> Self {
        let kind = match err {
            AccessError::UnknownProperty { .. } => AccessErrorKind::UnknownProperty,
            AccessError::ReadOnly { .. } => AccessErrorKind::ReadOnly,
            AccessError::WriteOnly { .. } => AccessErrorKind::WriteOnly,
            AccessError::TypeMismatch { .. } => AccessErrorKind::TypeMismatch,
            AccessError::InvalidReturnType { .. } => AccessErrorKind::InvalidReturnType,
            AccessError::Unset { .. } => AccessErrorKind::Unset,
        };

        Self::new(ErrorKind::Access(kind), ErrorOrigin::Accessor, err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, err.to_string())
    }
}

impl From<classprop_schema::Error> for Error {
    fn from(err: classprop_schema::Error) -> Self {
        CoreError::from(err).into()
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Schema(SchemaErrorKind),
    Validation(ValidationErrorKind),
    Access(AccessErrorKind),

    /// Engine configuration could not be read or was rejected.
    Config,
}

///
/// SchemaErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SchemaErrorKind {
    /// Declarations failed to build or a type list did not parse.
    Invalid,

    UnknownType,
    NoIdentifier,
    NotInstantiable,
    NotDescendant,

    /// A validation or default tag carries a malformed value.
    InvalidTag,

    NoDefault,
    Extension,
}

///
/// ValidationErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ValidationErrorKind {
    /// A rule was handed a value of the wrong basic kind.
    Internal,

    /// A well-typed value broke a declared constraint.
    User,
}

///
/// AccessErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AccessErrorKind {
    UnknownProperty,
    ReadOnly,
    WriteOnly,
    TypeMismatch,
    InvalidReturnType,
    Unset,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum ErrorOrigin {
    Accessor,
    Catalog,
    Config,
    Defaults,
    Identity,
    Schema,
    Validation,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_validation_is_the_only_user_facing_kind() {
        let user: Error = ValidationError::User {
            property: "Age".to_string(),
            message: "200 is larger than 150 for Age".to_string(),
        }
        .into();
        let internal: Error = ValidationError::Internal {
            property: "Age".to_string(),
            message: "Non-numeric value was passed for Age".to_string(),
        }
        .into();

        assert!(user.is_user_facing());
        assert_eq!(user.to_string(), "200 is larger than 150 for Age");
        assert!(!internal.is_user_facing());
        assert_eq!(internal.origin, ErrorOrigin::Validation);
    }

    #[test]
    fn schema_errors_keep_their_message() {
        let err: Error = CoreError::from(SchemaError::UnknownType("app::Ghost".to_string())).into();

        assert_eq!(err.kind, ErrorKind::Schema(SchemaErrorKind::UnknownType));
        assert_eq!(err.origin, ErrorOrigin::Catalog);
        assert_eq!(err.message, "type 'app::Ghost' is not registered");
    }

    #[test]
    fn config_errors_map_to_config_kind() {
        let err: Error = ConfigError::Invalid("bad marker".to_string()).into();

        assert_eq!(err.kind, ErrorKind::Config);
        assert_eq!(err.origin.to_string(), "Config");
    }
}
