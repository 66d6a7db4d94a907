//! Identifier resolution: which property identifies an entity type, and
//! reconstruction of an instance from an identifier value.

use crate::{
    Error,
    accessor::Instance,
    catalog::Catalog,
    error::SchemaError,
    property::Property,
    value::Value,
};
use classprop_schema::{node::SELF_IDENTIFIED, types::TypeToken};

/// Tag forcing a property to be identifier-eligible.
pub const PRIMARY_KEY_TAG: &str = "primary-key";

/// Tag designating the identifier among eligible properties.
pub const IDENTIFIER_TAG: &str = "identifier";

impl Catalog {
    /// Name of the identifier property of `path`, computed once and cached.
    pub fn identifier_name(&self, path: &str) -> Result<String, Error> {
        self.identifier_cache().get_or_try_insert(path, || {
            let name = self.compute_identifier(path)?;
            tracing::debug!(path, identifier = %name, "cached identifier");
            Ok(name)
        })
    }

    fn compute_identifier(&self, path: &str) -> Result<String, Error> {
        let mut fallback = None;

        for prop in self.properties(path)?.iter() {
            if !self.is_identifier_eligible(prop.as_ref()) {
                continue;
            }
            if prop.has_tag(IDENTIFIER_TAG) {
                return Ok(prop.name().to_string());
            }
            fallback.get_or_insert_with(|| prop.name().to_string());
        }

        fallback.ok_or_else(|| SchemaError::NoIdentifier(path.to_string()).into())
    }

    /// A primary-key tag, or every declared type is an int, a string, or
    /// an identifiable entity type.
    #[must_use]
    pub fn is_identifier_eligible(&self, prop: &dyn Property) -> bool {
        prop.has_tag(PRIMARY_KEY_TAG) || prop.types().iter().all(|t| self.is_identifier_type(t))
    }

    fn is_identifier_type(&self, token: &TypeToken) -> bool {
        match token {
            TypeToken::Primitive(prim) => prim.is_identifier_scalar(),
            TypeToken::Path(path) => self.is_identifiable_type(path),
            TypeToken::ListOf(_) => false,
        }
    }

    /// The type, or any of its ancestors, is flagged identifiable.
    fn is_identifiable_type(&self, path: &str) -> bool {
        let Some(decl) = self.schema().get(path) else {
            return false;
        };

        decl.identifiable || decl.ancestors().any(|a| self.is_identifiable_type(a))
    }

    /// Rebuild an instance of `path` from an identifier value.
    ///
    /// Self-identified types take the subtype path as their identifier and
    /// get a blank instance of that subtype. Everything else gets an empty
    /// instance with the identifier set through the normal checked write.
    pub fn from_identifier(&self, path: &str, ident: impl Into<Value>) -> Result<Instance, Error> {
        let ident = ident.into();

        if self.is_descendant(path, SELF_IDENTIFIED) {
            let target = ident.as_text().unwrap_or_default();
            if !self.is_strict_descendant(target, path) {
                return Err(SchemaError::NotDescendant {
                    path: ident.to_string(),
                    ancestor: path.to_string(),
                }
                .into());
            }

            return self.instantiate(target);
        }

        let name = self.identifier_name(path)?;
        let mut instance = self.instantiate(path)?;
        instance.set(&name, ident)?;

        Ok(instance)
    }
}

///
/// TESTS
///
