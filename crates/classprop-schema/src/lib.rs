//! Declarative property schema for ClassProp entity types.
//!
//! This crate defines *what exists*: type paths, their inheritance and
//! capability edges, and the per-property declarations (permission, type
//! list, free-text body with `@tag` directives). The runtime that enforces
//! these declarations lives in `classprop-core`.

pub mod error;
pub mod node;
pub mod tags;
pub mod types;
pub mod validate;

/// Maximum length for a fully-qualified type path.
pub const MAX_TYPE_PATH_LEN: usize = 256;

/// Maximum length for a property name.
pub const MAX_PROPERTY_NAME_LEN: usize = 64;

/// Maximum length for a tag name.
pub const MAX_TAG_NAME_LEN: usize = 64;

use crate::{error::ErrorTree, types::TypeTokenError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        error::ErrorTree,
        node::*,
        tags::TagMap,
        types::{Permission, Primitive, TypeToken},
    };
    pub use serde::Serialize;
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("schema validation failed:\n{0}")]
    Validation(ErrorTree),

    #[error(transparent)]
    TypeToken(#[from] TypeTokenError),
}
