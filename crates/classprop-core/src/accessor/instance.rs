use crate::{
    Error,
    accessor::AccessError,
    catalog::Catalog,
    property::{Property, decode_default},
    validate,
    value::Value,
};
use classprop_schema::types::render_type_list;
use std::{collections::BTreeMap, fmt, sync::Arc};

///
/// Instance
///
/// One entity value: a type path, the catalog that describes it, and a
/// private store for properties without a custom setter. Every read and
/// write goes through the type's descriptor list.
///

#[derive(Clone)]
pub struct Instance {
    catalog: Catalog,
    path: String,
    values: BTreeMap<String, Value>,
}

impl Instance {
    pub(crate) const fn new(catalog: Catalog, path: String) -> Self {
        Self {
            catalog,
            path,
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Raw store contents; custom accessors are not consulted.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    #[must_use]
    pub fn stored(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Write straight into the store, skipping every check. Meant for
    /// custom setters.
    pub fn store_raw(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    ///
    /// WRITE
    ///

    /// Checked write: permission, structural type, then the condition chain.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        self.set_value(name, value.into(), false)
    }

    /// Write that bypasses the read-only check and validation. The type
    /// check still applies.
    pub fn force_set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        self.set_value(name, value.into(), true)
    }

    fn set_value(&mut self, name: &str, value: Value, force: bool) -> Result<(), Error> {
        let prop = self.descriptor(name)?;
        tracing::trace!(path = %self.path, property = name, force, "set");

        if !force && !prop.can_write() {
            return Err(AccessError::ReadOnly {
                name: name.to_string(),
            }
            .into());
        }

        if !self.catalog.matches_types(prop.types(), &value) {
            return Err(AccessError::TypeMismatch {
                name: name.to_string(),
                expected: render_type_list(prop.types()),
                found: value.kind(),
            }
            .into());
        }

        if !force && !(prop.is_nullable() && value.is_null()) {
            validate::verify_property(prop.as_ref(), &value)?;
        }

        let setter = self.catalog.accessors().setter(&self.path, name);
        match setter {
            Some(setter) => setter(self, value),
            None => {
                self.values.insert(name.to_string(), value);
                Ok(())
            }
        }
    }

    /// Apply `set` per entry in order. A failure stops the loop; entries
    /// already applied stay applied.
    pub fn set_many<K, V, I>(&mut self, entries: I) -> Result<(), Error>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (name, value) in entries {
            self.set(name.as_ref(), value)?;
        }

        Ok(())
    }

    /// `set_many` with each key first matched case-insensitively against
    /// the declared names. Unmatched keys pass through unchanged.
    pub fn set_many_case_insensitive<K, V, I>(&mut self, entries: I) -> Result<(), Error>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut resolved = Vec::new();
        for (key, value) in entries {
            let key = self.catalog.case_insensitive_key(&self.path, key.as_ref())?;
            resolved.push((key, value));
        }

        self.set_many(resolved)
    }

    /// Drop a stored value. Custom accessors are not invoked.
    pub fn unset(&mut self, name: &str) {
        self.values.remove(name);
    }

    ///
    /// READ
    ///

    pub fn get(&self, name: &str) -> Result<Value, Error> {
        self.get_with(name, true)
    }

    /// Read a property; with `fill_default`, an unset property falls back to
    /// its decoded `@default` tag.
    pub fn get_with(&self, name: &str, fill_default: bool) -> Result<Value, Error> {
        let prop = self.descriptor(name)?;
        tracing::trace!(path = %self.path, property = name, "get");

        if !prop.can_read() {
            return Err(AccessError::WriteOnly {
                name: name.to_string(),
            }
            .into());
        }

        if let Some(getter) = self.catalog.accessors().getter(&self.path, name) {
            let value = getter(self)?;
            if !self.catalog.matches_types(prop.types(), &value) {
                return Err(AccessError::InvalidReturnType {
                    name: name.to_string(),
                    expected: render_type_list(prop.types()),
                    found: value.kind(),
                }
                .into());
            }

            return Ok(value);
        }

        if let Some(value) = self.values.get(name) {
            return Ok(value.clone());
        }

        if fill_default && let Some(raw) = prop.tag("default") {
            return decode_default(prop.as_ref(), raw);
        }

        Err(AccessError::Unset {
            name: name.to_string(),
        }
        .into())
    }

    /// Whether `get` would succeed; every failure reads as `false`.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Value of this instance's identifier property.
    pub fn identifier(&self) -> Result<Value, Error> {
        let name = self.catalog.identifier_name(&self.path)?;

        self.get(&name)
    }

    fn descriptor(&self, name: &str) -> Result<Arc<dyn Property>, Error> {
        self.catalog
            .property(&self.path, name)?
            .ok_or_else(|| {
                AccessError::UnknownProperty {
                    path: self.path.clone(),
                    name: name.to_string(),
                }
                .into()
            })
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.values == other.values
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("path", &self.path)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}
