//! The catalog: per-type descriptor lists and identifier names over a
//! validated [`Schema`], plus the resolved accessor overrides.

mod cache;
mod extract;
mod typecheck;


pub use cache::CacheStats;

use crate::{
    Error,
    accessor::{AccessorTable, Instance, ResolvedAccessors},
    catalog::{cache::TypeCache, extract::Extractor},
    error::SchemaError,
    property::{Property, PropertyExtension},
    value::Value,
};
use classprop_config::{CatalogConfig, EngineConfig};
use classprop_schema::{
    node::{CLASSNAME_PROPERTY, SELF_IDENTIFIED, Schema, TypeDecl, TypeKind},
    types::TypeToken,
};
use std::{fmt, sync::Arc};

/// Ordered, shared descriptor list for one type.
pub type PropertyList = Arc<[Arc<dyn Property>]>;

///
/// Resolution
///
/// Extended routes marked declarations to the persistence extension and is
/// cached. Plain always uses the default descriptor and is never cached.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Resolution {
    #[default]
    Extended,
    Plain,
}

///
/// Catalog
///
/// Cheap clonable handle. Caches fill on first use per type and are never
/// invalidated; the schema they derive from is immutable.
///

#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    schema: Schema,
    config: CatalogConfig,
    extension: Option<Arc<dyn PropertyExtension>>,
    accessors: ResolvedAccessors,
    properties: TypeCache<PropertyList>,
    identifiers: TypeCache<String>,
}

///
/// CatalogStats
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CatalogStats {
    pub properties: CacheStats,
    pub identifiers: CacheStats,
}

impl Catalog {
    pub fn new(schema: Schema) -> Result<Self, Error> {
        Self::builder(schema).build()
    }

    pub fn with_config(schema: Schema, config: EngineConfig) -> Result<Self, Error> {
        Self::builder(schema).config(config).build()
    }

    #[must_use]
    pub fn builder(schema: Schema) -> CatalogBuilder {
        CatalogBuilder::new(schema)
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    pub(crate) fn accessors(&self) -> &ResolvedAccessors {
        &self.inner.accessors
    }

    pub fn type_decl(&self, path: &str) -> Result<&TypeDecl, Error> {
        self.inner
            .schema
            .get(path)
            .ok_or_else(|| SchemaError::UnknownType(path.to_string()).into())
    }

    ///
    /// PROPERTIES
    ///

    /// Descriptor list for `path`, computed once and cached.
    pub fn properties(&self, path: &str) -> Result<PropertyList, Error> {
        self.properties_with(path, Resolution::Extended)
    }

    pub fn properties_with(&self, path: &str, resolution: Resolution) -> Result<PropertyList, Error> {
        match resolution {
            Resolution::Extended => self.inner.properties.get_or_try_insert(path, || {
                let list: PropertyList = self.extract(path, resolution)?.into();
                tracing::debug!(path, count = list.len(), "cached property descriptors");
                Ok(list)
            }),
            Resolution::Plain => Ok(self.extract(path, resolution)?.into()),
        }
    }

    fn extract(&self, path: &str, resolution: Resolution) -> Result<Vec<Arc<dyn Property>>, Error> {
        Extractor {
            schema: &self.inner.schema,
            extension: self.inner.extension.as_deref(),
            marker: &self.inner.config.extension_marker,
            resolution,
        }
        .extract(path)
    }

    /// First descriptor named `name`; own declarations shadow inherited ones.
    pub fn property(&self, path: &str, name: &str) -> Result<Option<Arc<dyn Property>>, Error> {
        let list = self.properties(path)?;

        Ok(list.iter().find(|p| p.name() == name).cloned())
    }

    /// Description of the first descriptor named `name`.
    pub fn property_value(&self, path: &str, name: &str) -> Result<Option<String>, Error> {
        Ok(self
            .property(path, name)?
            .map(|p| p.description().to_string()))
    }

    /// Declared spelling of `key`, matched case-insensitively; `key` itself
    /// when nothing matches. Never consults the persistence extension.
    pub fn case_insensitive_key(&self, path: &str, key: &str) -> Result<String, Error> {
        let list = self.properties_with(path, Resolution::Plain)?;

        Ok(list
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(key))
            .map_or_else(|| key.to_string(), |p| p.name().to_string()))
    }

    ///
    /// TYPES
    ///

    /// `child` is `ancestor`, or reaches it through parent and capability
    /// edges.
    #[must_use]
    pub fn is_descendant(&self, child: &str, ancestor: &str) -> bool {
        typecheck::is_descendant(&self.inner.schema, child, ancestor)
    }

    #[must_use]
    pub fn is_strict_descendant(&self, child: &str, ancestor: &str) -> bool {
        child != ancestor && self.is_descendant(child, ancestor)
    }

    /// Whether `value` matches at least one of `types`.
    #[must_use]
    pub fn matches_types(&self, types: &[TypeToken], value: &Value) -> bool {
        typecheck::matches_any(&self.inner.schema, types, value)
    }

    ///
    /// INSTANCES
    ///

    /// Empty instance of a concrete entity type.
    pub fn instantiate(&self, path: &str) -> Result<Instance, Error> {
        let decl = self.type_decl(path)?;

        let reason = match decl.kind {
            TypeKind::Capability => Some("capability types have no instances"),
            TypeKind::Entity if decl.is_abstract => Some("type is abstract"),
            TypeKind::Entity => None,
        };
        if let Some(reason) = reason {
            return Err(SchemaError::NotInstantiable {
                path: path.to_string(),
                reason,
            }
            .into());
        }

        Ok(Instance::new(self.clone(), path.to_string()))
    }

    /// New instance with `entries` applied through `set_many`.
    pub fn initialize<K, V, I>(&self, path: &str, entries: I) -> Result<Instance, Error>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut instance = self.instantiate(path)?;
        instance.set_many(entries)?;

        Ok(instance)
    }

    /// New instance with `entries` applied through
    /// `set_many_case_insensitive`.
    pub fn initialize_case_insensitive<K, V, I>(
        &self,
        path: &str,
        entries: I,
    ) -> Result<Instance, Error>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut instance = self.instantiate(path)?;
        instance.set_many_case_insensitive(entries)?;

        Ok(instance)
    }

    ///
    /// LIFECYCLE
    ///

    /// Fill the descriptor cache for every type and the identifier cache for
    /// every concrete entity.
    pub fn warm(&self) -> Result<(), Error> {
        for (path, decl) in self.inner.schema.iter() {
            self.properties(path)?;

            if !decl.is_concrete() {
                continue;
            }
            match self.identifier_name(path) {
                Ok(_) => {}
                Err(err) if self.inner.config.require_identifiers => return Err(err),
                Err(err) => tracing::debug!(path, error = %err, "type has no identifier"),
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            properties: self.inner.properties.stats(),
            identifiers: self.inner.identifiers.stats(),
        }
    }

    pub(crate) fn identifier_cache(&self) -> &TypeCache<String> {
        &self.inner.identifiers
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("types", &self.inner.schema.len())
            .field("config", &self.inner.config)
            .field("extension", &self.inner.extension.is_some())
            .field("accessors", &self.inner.accessors)
            .finish_non_exhaustive()
    }
}

///
/// CatalogBuilder
///

pub struct CatalogBuilder {
    schema: Schema,
    config: EngineConfig,
    extension: Option<Arc<dyn PropertyExtension>>,
    accessors: AccessorTable,
}

impl CatalogBuilder {
    fn new(schema: Schema) -> Self {
        let mut accessors = AccessorTable::new();
        accessors.register_getter(SELF_IDENTIFIED, CLASSNAME_PROPERTY, |inst: &Instance| {
            Ok(Value::Text(inst.path().to_string()))
        });

        Self {
            schema,
            config: EngineConfig::default(),
            extension: None,
            accessors,
        }
    }

    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn extension(mut self, extension: impl PropertyExtension + 'static) -> Self {
        self.extension = Some(Arc::new(extension));
        self
    }

    /// Custom read for `name` on `path` and its parent-chain descendants.
    #[must_use]
    pub fn getter<F>(mut self, path: &str, name: &str, getter: F) -> Self
    where
        F: Fn(&Instance) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.accessors.register_getter(path, name, getter);
        self
    }

    /// Custom write for `name` on `path` and its parent-chain descendants.
    #[must_use]
    pub fn setter<F>(mut self, path: &str, name: &str, setter: F) -> Self
    where
        F: Fn(&mut Instance, Value) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.accessors.register_setter(path, name, setter);
        self
    }

    pub fn build(self) -> Result<Catalog, Error> {
        let accessors = self.accessors.resolve(&self.schema)?;
        let warm = self.config.catalog.warm_on_build;

        let catalog = Catalog {
            inner: Arc::new(CatalogInner {
                schema: self.schema,
                config: self.config.catalog,
                extension: self.extension,
                accessors,
                properties: TypeCache::new(),
                identifiers: TypeCache::new(),
            }),
        };

        if warm {
            catalog.warm()?;
        }
        tracing::debug!(types = catalog.schema().len(), warm, "catalog built");

        Ok(catalog)
    }
}
