use crate::{
    error::{Error, SchemaError},
    value::Value,
};
use classprop_schema::{
    node::PropertyDecl,
    tags::{TagMap, parse_body},
    types::{Permission, TypeToken, parse_type_list},
};
use std::{any::Any, fmt, sync::Arc};

///
/// Property
///
/// Read-only contract every descriptor satisfies, whether built by the
/// catalog or returned by a [`PropertyExtension`].
///

pub trait Property: fmt::Debug + Send + Sync {
    /// Path of the type that declared this property.
    fn owner(&self) -> &str;

    fn name(&self) -> &str;

    /// Declared type alternatives, never empty.
    fn types(&self) -> &[TypeToken];

    fn permission(&self) -> Permission;

    fn description(&self) -> &str;

    fn tags(&self) -> &TagMap;

    /// Downcast hook for extensions that attach their own metadata.
    fn as_any(&self) -> &dyn Any;

    fn can_read(&self) -> bool {
        self.permission().can_read()
    }

    fn can_write(&self) -> bool {
        self.permission().can_write()
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags().contains(tag)
    }

    fn tag(&self, tag: &str) -> Option<&str> {
        self.tags().value(tag)
    }

    /// Whether `null` is among the declared types.
    fn is_nullable(&self) -> bool {
        self.types().iter().any(TypeToken::is_null)
    }
}

///
/// PropertyDescriptor
///
/// Default descriptor: one declaration with its body split into a
/// description and tag map.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyDescriptor {
    owner: String,
    name: String,
    types: Vec<TypeToken>,
    permission: Permission,
    description: String,
    tags: TagMap,
}

impl PropertyDescriptor {
    /// Build a descriptor from raw parts, parsing `@tag` directives out of
    /// `body`.
    pub fn new(
        owner: &str,
        name: &str,
        types: Vec<TypeToken>,
        permission: Permission,
        body: &str,
    ) -> Result<Self, SchemaError> {
        let (description, tags) = parse_body(body);

        Self::from_parts(owner, name, types, permission, description, tags)
    }

    pub(crate) fn from_decl(owner: &str, decl: &PropertyDecl) -> Result<Self, SchemaError> {
        let types = decl_types(decl)?;
        let (description, tags) = decl.parts();

        Self::from_parts(owner, &decl.name, types, decl.permission, description, tags)
    }

    fn from_parts(
        owner: &str,
        name: &str,
        types: Vec<TypeToken>,
        permission: Permission,
        description: String,
        tags: TagMap,
    ) -> Result<Self, SchemaError> {
        if types.is_empty() {
            return Err(SchemaError::InvalidTypes {
                property: name.to_string(),
                source: classprop_schema::types::TypeTokenError::EmptyList,
            });
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            types,
            permission,
            description,
            tags,
        })
    }
}

impl Property for PropertyDescriptor {
    fn owner(&self) -> &str {
        &self.owner
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn types(&self) -> &[TypeToken] {
        &self.types
    }

    fn permission(&self) -> Permission {
        self.permission
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tags(&self) -> &TagMap {
        &self.tags
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn decl_types(decl: &PropertyDecl) -> Result<Vec<TypeToken>, SchemaError> {
    parse_type_list(&decl.types).map_err(|source| SchemaError::InvalidTypes {
        property: decl.name.clone(),
        source,
    })
}

/// Decode a `@default` tag value as a structured literal.
pub(crate) fn decode_default(prop: &dyn Property, raw: &str) -> Result<Value, Error> {
    Value::parse_json(raw).map_err(|err| {
        SchemaError::invalid_tag(prop.name(), "default", Some(raw), err.to_string()).into()
    })
}

///
/// ExtensionRequest
///
/// Inputs handed to a [`PropertyExtension`] for one marked declaration.
/// `types` holds at most the first two declared alternatives.
///

#[derive(Clone, Copy, Debug)]
pub struct ExtensionRequest<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub types: &'a [TypeToken],
    pub permission: Permission,
    /// Full annotation body, tags included.
    pub description: &'a str,
}

///
/// PropertyExtension
///
/// Persistence-side descriptor factory. Invoked instead of the default
/// constructor when a declaration carries the configured marker tag.
///

pub trait PropertyExtension: Send + Sync {
    /// Body marker routed to this extension; `None` defers to the
    /// configured `extension_marker`.
    fn marker(&self) -> Option<&str> {
        None
    }

    fn create(&self, request: ExtensionRequest<'_>) -> Result<Arc<dyn Property>, Error>;
}

impl<F> PropertyExtension for F
where
    F: Fn(ExtensionRequest<'_>) -> Result<Arc<dyn Property>, Error> + Send + Sync,
{
    fn create(&self, request: ExtensionRequest<'_>) -> Result<Arc<dyn Property>, Error> {
        self(request)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use classprop_schema::types::Primitive;

    #[test]
    fn descriptor_splits_body() {
        let decl = PropertyDecl::read_write("Age", "int|null").body("Age in years @min 0");
        let prop = PropertyDescriptor::from_decl("app::User", &decl).unwrap();

        assert_eq!(prop.owner(), "app::User");
        assert_eq!(prop.description(), "Age in years");
        assert_eq!(prop.tag("min"), Some("0"));
        assert!(prop.is_nullable());
        assert!(prop.can_read() && prop.can_write());
    }

    #[test]
    fn descriptor_rejects_unparsable_types() {
        let decl = PropertyDecl::read_write("Age", "int|");

        assert!(matches!(
            PropertyDescriptor::from_decl("app::User", &decl),
            Err(SchemaError::InvalidTypes { .. })
        ));
    }

    #[test]
    fn new_parses_raw_body() {
        let prop = PropertyDescriptor::new(
            "app::User",
            "Flag",
            vec![TypeToken::Primitive(Primitive::Bool)],
            Permission::ReadOnly,
            "Flag @unsigned",
        )
        .unwrap();

        assert!(prop.has_tag("unsigned"));
        assert_eq!(prop.tag("unsigned"), None);
        assert!(!prop.can_write());
    }
}
