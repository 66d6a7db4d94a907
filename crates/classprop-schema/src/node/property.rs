use crate::{
    tags::{TagMap, parse_body},
    types::{Permission, TypeToken, TypeTokenError, parse_type_list},
};
use serde::Serialize;

///
/// PropertyDecl
///
/// One declared property, the explicit form of a `@property` annotation:
/// permission kind, pipe-delimited type list, name, and a free-text body
/// that may embed `@tag value` directives.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PropertyDecl {
    pub permission: Permission,
    pub types: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_tags: Vec<(String, Option<String>)>,
}

impl PropertyDecl {
    #[must_use]
    pub fn new(permission: Permission, types: &str, name: &str) -> Self {
        Self {
            permission,
            types: types.to_string(),
            name: name.to_string(),
            body: String::new(),
            extra_tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn read_write(name: &str, types: &str) -> Self {
        Self::new(Permission::ReadWrite, types, name)
    }

    #[must_use]
    pub fn read_only(name: &str, types: &str) -> Self {
        Self::new(Permission::ReadOnly, types, name)
    }

    #[must_use]
    pub fn write_only(name: &str, types: &str) -> Self {
        Self::new(Permission::WriteOnly, types, name)
    }

    /// Set the free-text body (description plus embedded tags).
    #[must_use]
    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Attach a valued tag without textual `@` syntax.
    #[must_use]
    pub fn tag(mut self, name: &str, value: &str) -> Self {
        self.extra_tags
            .push((name.to_string(), Some(value.to_string())));
        self
    }

    /// Attach a presence-only tag.
    #[must_use]
    pub fn flag(mut self, name: &str) -> Self {
        self.extra_tags.push((name.to_string(), None));
        self
    }

    pub fn type_tokens(&self) -> Result<Vec<TypeToken>, TypeTokenError> {
        parse_type_list(&self.types)
    }

    /// Description and tag map; explicit tags follow body tags.
    #[must_use]
    pub fn parts(&self) -> (String, TagMap) {
        let (description, mut tags) = parse_body(&self.body);
        for (name, value) in &self.extra_tags {
            tags.insert(name.clone(), value.clone());
        }

        (description, tags)
    }

    /// Whether `@marker` appears in the body or as an explicit tag.
    #[must_use]
    pub fn mentions_tag(&self, marker: &str) -> bool {
        self.body.contains(&format!("@{marker}"))
            || self.extra_tags.iter().any(|(n, _)| n == marker)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_tags_follow_body_tags() {
        let decl = PropertyDecl::read_write("Age", "int")
            .body("Age @min 0")
            .tag("max", "150")
            .flag("unsigned");

        let (desc, tags) = decl.parts();
        assert_eq!(desc, "Age");
        let names: Vec<_> = tags.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["min", "max", "unsigned"]);
    }

    #[test]
    fn mentions_tag_checks_body_and_explicit_tags() {
        let body = PropertyDecl::read_write("Id", "int").body("Key @database-column id");
        let explicit = PropertyDecl::read_write("Id", "int").flag("database-column");
        let none = PropertyDecl::read_write("Id", "int").body("Key");

        assert!(body.mentions_tag("database-column"));
        assert!(explicit.mentions_tag("database-column"));
        assert!(!none.mentions_tag("database-column"));
    }
}
