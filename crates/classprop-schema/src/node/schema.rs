use crate::{
    Error,
    error::ErrorTree,
    node::{TypeDecl, self_identified},
    validate::validate_schema,
};
use serde::Serialize;
use std::collections::BTreeMap;

///
/// Schema
///
/// Validated table of type declarations keyed by path. Built once through
/// [`SchemaBuilder`]; immutable afterwards.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct Schema {
    types: BTreeMap<String, TypeDecl>,
}

impl Schema {
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&TypeDecl> {
        self.types.get(path)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.types.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDecl)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

///
/// SchemaBuilder
///

#[derive(Clone, Debug)]
pub struct SchemaBuilder {
    decls: Vec<TypeDecl>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Start a builder seeded with the built-in types.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decls: vec![self_identified()],
        }
    }

    #[must_use]
    pub fn add(mut self, decl: TypeDecl) -> Self {
        self.decls.push(decl);
        self
    }

    #[must_use]
    pub fn extend(mut self, decls: impl IntoIterator<Item = TypeDecl>) -> Self {
        self.decls.extend(decls);
        self
    }

    /// Validate every declaration and freeze the table.
    pub fn build(self) -> Result<Schema, Error> {
        let mut errs = ErrorTree::new();
        let mut types = BTreeMap::new();

        for decl in self.decls {
            if types.contains_key(&decl.path) {
                errs.add_for(decl.path.clone(), "duplicate type path");
                continue;
            }
            types.insert(decl.path.clone(), decl);
        }

        let schema = Schema { types };
        if let Err(tree) = validate_schema(&schema) {
            for (route, message) in tree.flatten() {
                errs.add_for(route, message);
            }
        }

        errs.result().map_err(Error::Validation)?;

        Ok(schema)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{PropertyDecl, SELF_IDENTIFIED};

    #[test]
    fn builder_seeds_builtin_types() {
        let schema = Schema::builder().build().unwrap();

        assert!(schema.contains(SELF_IDENTIFIED));
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let err = Schema::builder()
            .add(TypeDecl::entity("app::User"))
            .add(TypeDecl::entity("app::User"))
            .build()
            .unwrap_err();

        let Error::Validation(tree) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            tree.flatten(),
            vec![("app::User".to_string(), "duplicate type path".to_string())]
        );
    }

    #[test]
    fn builds_a_small_hierarchy() {
        let schema = Schema::builder()
            .add(
                TypeDecl::capability("app::Named")
                    .property(PropertyDecl::read_write("Name", "string")),
            )
            .add(
                TypeDecl::entity("app::User")
                    .implements("app::Named")
                    .property(PropertyDecl::read_only("Id", "int")),
            )
            .build()
            .unwrap();

        let user = schema.get("app::User").unwrap();
        assert_eq!(user.ancestors().collect::<Vec<_>>(), vec!["app::Named"]);
    }
}
