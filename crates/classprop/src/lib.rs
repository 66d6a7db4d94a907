//! ## Crate layout
//! - `config`: engine configuration read from `classprop.toml`.
//! - `core`: runtime catalog, values, condition chain, accessor dispatch,
//!   identifier resolution, and blank-object synthesis.
//! - `schema`: type and property declarations plus build-time validation.
//!
//! The `prelude` module carries the vocabulary most callers need; the
//! public [`Error`] flattens every layer's failures into one stable
//! taxonomy.

pub use classprop_config as config;
pub use classprop_core as core;
pub use classprop_schema as schema;

mod error;

pub use error::{
    AccessErrorKind, Error, ErrorKind, ErrorOrigin, SchemaErrorKind, ValidationErrorKind,
};

use classprop_config::{CONFIG_FILE_NAME, EngineConfig};
use classprop_core::catalog::Catalog;
use classprop_schema::node::Schema;
use std::path::Path;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a catalog over `schema`, configured from `dir/classprop.toml` when
/// that file exists and from defaults otherwise.
pub fn load(schema: Schema, dir: impl AsRef<Path>) -> Result<Catalog, Error> {
    let path = dir.as_ref().join(CONFIG_FILE_NAME);

    let config = if path.is_file() {
        EngineConfig::from_path(&path)?
    } else {
        tracing::debug!(path = %path.display(), "no engine config, using defaults");
        EngineConfig::default()
    };

    Ok(Catalog::with_config(schema, config)?)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error,
        config::EngineConfig,
        core::{
            accessor::Instance,
            catalog::{Catalog, Resolution},
            property::{Property, PropertyDescriptor, PropertyExtension},
            value::{Value, ValueKind},
        },
        schema::{
            node::{PropertyDecl, Schema, TypeDecl},
            types::{Permission, TypeToken},
        },
    };
}
