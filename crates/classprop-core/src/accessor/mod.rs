//! Property access on entity instances and the custom accessor overrides
//! that can replace the default value store.

mod instance;


pub use instance::Instance;

use crate::{
    Error,
    error::SchemaError,
    value::{Value, ValueKind},
};
use classprop_schema::node::Schema;
use std::{collections::BTreeMap, fmt, sync::Arc};
use thiserror::Error as ThisError;

///
/// AccessError
///

#[derive(Debug, ThisError)]
pub enum AccessError {
    #[error("attempt to access undefined property '{name}' on '{path}'")]
    UnknownProperty { path: String, name: String },

    #[error("attempt to set read-only property '{name}'")]
    ReadOnly { name: String },

    #[error("attempt to get write-only property '{name}'")]
    WriteOnly { name: String },

    #[error("attempt to set property '{name}' to a {found}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: ValueKind,
    },

    #[error("attempt to return invalid type {found} for '{name}', expected {expected}")]
    InvalidReturnType {
        name: String,
        expected: String,
        found: ValueKind,
    },

    #[error("attempt to get unset property '{name}'")]
    Unset { name: String },
}

/// Custom read override for one property.
pub type Getter = Arc<dyn Fn(&Instance) -> Result<Value, Error> + Send + Sync>;

/// Custom write override for one property; replaces the default store.
pub type Setter = Arc<dyn Fn(&mut Instance, Value) -> Result<(), Error> + Send + Sync>;

///
/// Accessors
///

#[derive(Clone, Default)]
pub(crate) struct Accessors {
    pub(crate) getter: Option<Getter>,
    pub(crate) setter: Option<Setter>,
}

impl Accessors {
    /// Fill missing slots from an inherited entry.
    fn inherit(&mut self, parent: &Self) {
        if self.getter.is_none() {
            self.getter.clone_from(&parent.getter);
        }
        if self.setter.is_none() {
            self.setter.clone_from(&parent.setter);
        }
    }
}

///
/// AccessorTable
///
/// Overrides registered per (type path, property name). Only what a type
/// registers itself is stored here; inheritance is applied by
/// [`AccessorTable::resolve`].
///

#[derive(Clone, Default)]
pub struct AccessorTable {
    types: BTreeMap<String, BTreeMap<String, Accessors>>,
}

impl AccessorTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_getter<F>(&mut self, path: &str, name: &str, getter: F)
    where
        F: Fn(&Instance) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.slot(path, name).getter = Some(Arc::new(getter));
    }

    pub fn register_setter<F>(&mut self, path: &str, name: &str, setter: F)
    where
        F: Fn(&mut Instance, Value) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.slot(path, name).setter = Some(Arc::new(setter));
    }

    fn slot(&mut self, path: &str, name: &str) -> &mut Accessors {
        self.types
            .entry(path.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default()
    }

    /// Effective table for every schema type: own overrides shadow those
    /// found along the parent chain. Capabilities contribute nothing.
    pub(crate) fn resolve(&self, schema: &Schema) -> Result<ResolvedAccessors, SchemaError> {
        if let Some(path) = self.types.keys().find(|path| !schema.contains(path)) {
            return Err(SchemaError::UnknownOverrideType(path.clone()));
        }

        let mut resolved = BTreeMap::new();
        for path in schema.paths() {
            let mut effective: BTreeMap<String, Accessors> = BTreeMap::new();
            let mut cursor = Some(path);

            while let Some(current) = cursor {
                if let Some(own) = self.types.get(current) {
                    for (name, accessors) in own {
                        effective.entry(name.clone()).or_default().inherit(accessors);
                    }
                }
                cursor = schema.get(current).and_then(|decl| decl.parent.as_deref());
            }

            if !effective.is_empty() {
                resolved.insert(path.to_string(), effective);
            }
        }

        Ok(ResolvedAccessors { types: resolved })
    }
}

impl fmt::Debug for AccessorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_entries(f, &self.types)
    }
}

///
/// ResolvedAccessors
///

#[derive(Clone, Default)]
pub(crate) struct ResolvedAccessors {
    types: BTreeMap<String, BTreeMap<String, Accessors>>,
}

impl ResolvedAccessors {
    fn lookup(&self, path: &str, name: &str) -> Option<&Accessors> {
        self.types.get(path).and_then(|props| props.get(name))
    }

    pub(crate) fn getter(&self, path: &str, name: &str) -> Option<Getter> {
        self.lookup(path, name).and_then(|a| a.getter.clone())
    }

    pub(crate) fn setter(&self, path: &str, name: &str) -> Option<Setter> {
        self.lookup(path, name).and_then(|a| a.setter.clone())
    }
}

impl fmt::Debug for ResolvedAccessors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_entries(f, &self.types)
    }
}

fn debug_entries(
    f: &mut fmt::Formatter<'_>,
    types: &BTreeMap<String, BTreeMap<String, Accessors>>,
) -> fmt::Result {
    f.debug_map()
        .entries(types.iter().map(|(path, props)| {
            let names: Vec<_> = props
                .iter()
                .map(|(name, a)| {
                    let kind = match (a.getter.is_some(), a.setter.is_some()) {
                        (true, true) => "get+set",
                        (true, false) => "get",
                        (false, true) => "set",
                        (false, false) => "-",
                    };
                    format!("{name}({kind})")
                })
                .collect();
            (path, names)
        }))
        .finish()
}
