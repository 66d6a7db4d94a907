use derive_more::Display;
use serde::Serialize;
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// TypeTokenError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TypeTokenError {
    #[error("type list is empty")]
    EmptyList,

    #[error("empty type token in '{0}'")]
    EmptyToken(String),

    #[error("invalid type token '{0}'")]
    Invalid(String),
}

///
/// Permission
///
/// Read/write capability of one declared property. Parsed from the
/// annotation kind that declared it.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
pub enum Permission {
    #[display("property-read")]
    ReadOnly,
    #[display("property-write")]
    WriteOnly,
    #[display("property")]
    ReadWrite,
}

impl Permission {
    #[must_use]
    pub const fn can_read(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    #[must_use]
    pub const fn can_write(self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }

    /// Map an annotation kind onto its permission.
    #[must_use]
    pub fn from_annotation(kind: &str) -> Option<Self> {
        match kind {
            "property" => Some(Self::ReadWrite),
            "property-read" => Some(Self::ReadOnly),
            "property-write" => Some(Self::WriteOnly),
            _ => None,
        }
    }
}

impl FromStr for Permission {
    type Err = TypeTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_annotation(s.trim().trim_start_matches('@'))
            .ok_or_else(|| TypeTokenError::Invalid(s.to_string()))
    }
}

///
/// Primitive
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum Primitive {
    #[display("array")]
    Array,
    #[display("bool")]
    Bool,
    #[display("DateTime")]
    DateTime,
    #[display("float")]
    Float,
    #[display("int")]
    Int,
    #[display("Iterator")]
    Iterator,
    #[display("mixed")]
    Mixed,
    #[display("null")]
    Null,
    #[display("resource")]
    Resource,
    #[display("string")]
    Text,
}

impl Primitive {
    /// Resolve a primitive from one of its accepted spellings.
    #[must_use]
    pub fn from_alias(token: &str) -> Option<Self> {
        let lower = token.to_ascii_lowercase();

        let prim = match lower.as_str() {
            "array" => Self::Array,
            "bool" | "boolean" | "false" | "true" => Self::Bool,
            "datetime" | "datetimeinterface" | "datetimeimmutable" => Self::DateTime,
            "float" | "double" | "real" => Self::Float,
            "int" | "integer" => Self::Int,
            "iterator" | "iterable" | "traversable" | "generator" => Self::Iterator,
            "mixed" => Self::Mixed,
            "null" | "void" => Self::Null,
            "resource" => Self::Resource,
            "string" => Self::Text,
            _ if lower.starts_with("array<") || lower.starts_with("array{") => Self::Array,
            _ if lower.starts_with("iterator<") || lower.starts_with("iterable<") => {
                Self::Iterator
            }
            _ => return None,
        };

        Some(prim)
    }

    /// Scalar kinds that can serve as an entity identifier on their own.
    #[must_use]
    pub const fn is_identifier_scalar(self) -> bool {
        matches!(self, Self::Int | Self::Text)
    }
}

///
/// TypeToken
///
/// One alternative of a property's declared type list: a primitive, a
/// fully-qualified entity or capability path, or a collection of another
/// token.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum TypeToken {
    Primitive(Primitive),
    Path(String),
    ListOf(Box<Self>),
}

impl TypeToken {
    #[must_use]
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    #[must_use]
    pub fn list_of(inner: Self) -> Self {
        Self::ListOf(Box::new(inner))
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Primitive(Primitive::Null))
    }

    #[must_use]
    pub const fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Self::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Self::Path(p) => Some(p.as_str()),
            _ => None,
        }
    }

    /// Every entity/capability path referenced by this token, including
    /// through collection markers.
    #[must_use]
    pub fn referenced_path(&self) -> Option<&str> {
        match self {
            Self::Primitive(_) => None,
            Self::Path(p) => Some(p.as_str()),
            Self::ListOf(inner) => inner.referenced_path(),
        }
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Path(p) => write!(f, "{p}"),
            Self::ListOf(inner) => write!(f, "{inner}[]"),
        }
    }
}

impl From<Primitive> for TypeToken {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl FromStr for TypeToken {
    type Err = TypeTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err(TypeTokenError::EmptyToken(s.to_string()));
        }

        if let Some(inner) = token.strip_suffix("[]") {
            return Ok(Self::list_of(inner.parse()?));
        }

        let token = token.trim_start_matches('\\');
        if let Some(prim) = Primitive::from_alias(token) {
            return Ok(Self::Primitive(prim));
        }

        let valid = token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '\\'));
        if token.is_empty() || !valid {
            return Err(TypeTokenError::Invalid(s.to_string()));
        }

        Ok(Self::Path(token.to_string()))
    }
}

/// Parse a pipe-delimited type list such as `int|null` or `string[]|app::Tag`.
pub fn parse_type_list(list: &str) -> Result<Vec<TypeToken>, TypeTokenError> {
    if list.trim().is_empty() {
        return Err(TypeTokenError::EmptyList);
    }

    list.split('|').map(str::parse).collect()
}

/// Render a type list back into its pipe-delimited form.
#[must_use]
pub fn render_type_list(tokens: &[TypeToken]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

///
/// TESTS
///
