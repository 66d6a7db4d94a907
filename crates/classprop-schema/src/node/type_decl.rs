use crate::node::PropertyDecl;
use derive_more::Display;
use serde::Serialize;

///
/// TypeKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
pub enum TypeKind {
    /// Interface-like type: carries declarations, never instantiated.
    Capability,
    Entity,
}

///
/// TypeDecl
///
/// Declarations attached to one type, plus its inheritance edges.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TypeDecl {
    pub path: String,
    pub kind: TypeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,

    pub is_abstract: bool,

    /// Whether values of this type may serve as another entity's identifier.
    pub identifiable: bool,

    pub properties: Vec<PropertyDecl>,
}

impl TypeDecl {
    #[must_use]
    pub fn entity(path: &str) -> Self {
        Self::new(path, TypeKind::Entity)
    }

    #[must_use]
    pub fn capability(path: &str) -> Self {
        Self::new(path, TypeKind::Capability)
    }

    fn new(path: &str, kind: TypeKind) -> Self {
        Self {
            path: path.to_string(),
            kind,
            parent: None,
            capabilities: Vec::new(),
            is_abstract: false,
            identifiable: matches!(kind, TypeKind::Entity),
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn extends(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    #[must_use]
    pub fn implements(mut self, capability: &str) -> Self {
        self.capabilities.push(capability.to_string());
        self
    }

    #[must_use]
    pub const fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub const fn identifiable(mut self, identifiable: bool) -> Self {
        self.identifiable = identifiable;
        self
    }

    #[must_use]
    pub fn property(mut self, decl: PropertyDecl) -> Self {
        self.properties.push(decl);
        self
    }

    #[must_use]
    pub fn properties(mut self, decls: impl IntoIterator<Item = PropertyDecl>) -> Self {
        self.properties.extend(decls);
        self
    }

    /// Entity types that can be instantiated.
    #[must_use]
    pub const fn is_concrete(&self) -> bool {
        matches!(self.kind, TypeKind::Entity) && !self.is_abstract
    }

    /// Direct ancestors: parent first, then capabilities in declaration order.
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.parent
            .as_deref()
            .into_iter()
            .chain(self.capabilities.iter().map(String::as_str))
    }
}
