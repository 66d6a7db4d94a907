//! Core runtime for ClassProp: the property catalog, values, condition
//! chain, accessor dispatch, identifier resolution, and blank-object
//! synthesis.
//!
//! Everything here is synchronous and in-memory. Schema declarations come
//! from `classprop-schema`; the catalog turns them into descriptor lists,
//! caches them per type, and enforces them on every read and write.
#![warn(unreachable_pub)]

pub mod accessor;
pub mod catalog;
pub mod defaults;
pub mod error;
pub mod identity;
pub mod property;
pub mod validate;
pub mod value;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// Prelude
///
/// Domain vocabulary only; errors and builders stay in their modules.
///

pub mod prelude {
    pub use crate::{
        accessor::Instance,
        catalog::{Catalog, Resolution},
        property::Property,
        value::{Value, ValueKind},
    };
}
