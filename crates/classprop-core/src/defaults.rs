//! Blank-instance synthesis from declared types.

use crate::{Error, accessor::Instance, catalog::Catalog, error::SchemaError, value::Value};
use classprop_schema::types::{Primitive, TypeToken, render_type_list};
use std::collections::BTreeSet;

/// Kind-appropriate zero value for a declared type list.
///
/// Checked in a fixed order regardless of declaration order: null, string,
/// int, float, array, bool, iterator, typed collection, date/time.
#[must_use]
pub fn default_value_for(types: &[TypeToken]) -> Option<Value> {
    let has = |prim: Primitive| types.iter().any(|t| t.as_primitive() == Some(prim));

    let value = if has(Primitive::Null) {
        Value::Null
    } else if has(Primitive::Text) {
        Value::Text(String::new())
    } else if has(Primitive::Int) {
        Value::Int(0)
    } else if has(Primitive::Float) {
        Value::Float(0.0)
    } else if has(Primitive::Array) {
        Value::List(Vec::new())
    } else if has(Primitive::Bool) {
        Value::Bool(false)
    } else if has(Primitive::Iterator) {
        Value::empty_stream()
    } else if types.iter().any(|t| matches!(t, TypeToken::ListOf(_))) {
        Value::List(Vec::new())
    } else if has(Primitive::DateTime) {
        Value::epoch()
    } else {
        return None;
    };

    Some(value)
}

impl Catalog {
    /// Instance of `path` with every declared property force-set to its
    /// type's zero value. Shadowed declarations are skipped.
    pub fn plain_object(&self, path: &str) -> Result<Instance, Error> {
        let mut instance = self.instantiate(path)?;
        let mut seen = BTreeSet::new();

        for prop in self.properties(path)?.iter() {
            if !seen.insert(prop.name().to_string()) {
                continue;
            }

            let value = default_value_for(prop.types()).ok_or_else(|| SchemaError::NoDefault {
                property: prop.name().to_string(),
                types: render_type_list(prop.types()),
            })?;
            instance.force_set(prop.name(), value)?;
        }

        Ok(instance)
    }
}

///
/// TESTS
///
