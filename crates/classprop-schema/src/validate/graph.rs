use crate::{
    err,
    error::ErrorTree,
    node::{Schema, TypeKind},
};
use std::collections::BTreeMap;

/// Check that every parent, capability, and entity-typed token resolves.
pub fn validate_references(schema: &Schema, errs: &mut ErrorTree) {
    for (path, decl) in schema.iter() {
        let mut type_errs = ErrorTree::new();

        if let Some(parent) = &decl.parent {
            match schema.get(parent) {
                None => err!(type_errs, "parent '{parent}' is not registered"),
                Some(p) if p.kind != TypeKind::Entity => {
                    err!(type_errs, "parent '{parent}' is a {} not an Entity", p.kind);
                }
                Some(_) if decl.kind == TypeKind::Capability => {
                    err!(type_errs, "capability cannot extend entity '{parent}'");
                }
                Some(_) => {}
            }
        }

        for cap in &decl.capabilities {
            match schema.get(cap) {
                None => err!(type_errs, "capability '{cap}' is not registered"),
                Some(c) if c.kind != TypeKind::Capability => {
                    err!(type_errs, "'{cap}' is an {} not a Capability", c.kind);
                }
                Some(_) => {}
            }
        }

        for prop in &decl.properties {
            let Ok(tokens) = prop.type_tokens() else {
                continue;
            };
            for token in &tokens {
                if let Some(target) = token.referenced_path()
                    && !schema.contains(target)
                {
                    type_errs.add_for(
                        prop.name.clone(),
                        format!("type '{target}' is not registered"),
                    );
                }
            }
        }

        errs.merge_for(path, type_errs);
    }
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Reject cycles through parent and capability edges.
pub fn validate_acyclic(schema: &Schema, errs: &mut ErrorTree) {
    let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();

    for path in schema.paths() {
        let mut stack = Vec::new();
        visit(schema, path, &mut marks, &mut stack, errs);
    }
}

fn visit<'a>(
    schema: &'a Schema,
    path: &'a str,
    marks: &mut BTreeMap<&'a str, Mark>,
    stack: &mut Vec<&'a str>,
    errs: &mut ErrorTree,
) {
    match marks.get(path) {
        Some(Mark::Done) => return,
        Some(Mark::Visiting) => {
            let start = stack.iter().position(|p| *p == path).unwrap_or(0);
            let mut cycle = stack[start..].to_vec();
            cycle.push(path);
            errs.add_for(path, format!("inheritance cycle: {}", cycle.join(" -> ")));
            return;
        }
        None => {}
    }

    let Some(decl) = schema.get(path) else {
        return;
    };

    marks.insert(path, Mark::Visiting);
    stack.push(path);
    for ancestor in decl.ancestors() {
        visit(schema, ancestor, marks, stack, errs);
    }
    stack.pop();
    marks.insert(path, Mark::Done);
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        node::{PropertyDecl, Schema, TypeDecl},
    };

    fn routes(err: Error) -> Vec<(String, String)> {
        match err {
            Error::Validation(tree) => tree.flatten(),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn unknown_references_are_reported() {
        let err = Schema::builder()
            .add(
                TypeDecl::entity("app::User")
                    .extends("app::Missing")
                    .implements("app::AlsoMissing")
                    .property(PropertyDecl::read_write("Friend", "app::Ghost|null")),
            )
            .build()
            .unwrap_err();

        let flat = routes(err);
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[2].0, "app::User.Friend");
    }

    #[test]
    fn kind_mismatches_are_reported() {
        let err = Schema::builder()
            .add(TypeDecl::capability("app::Named"))
            .add(TypeDecl::entity("app::Base"))
            .add(TypeDecl::entity("app::A").extends("app::Named"))
            .add(TypeDecl::entity("app::B").implements("app::Base"))
            .build()
            .unwrap_err();

        let flat = routes(err);
        let routes: Vec<_> = flat.iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(routes, vec!["app::A", "app::B"]);
    }

    #[test]
    fn cycles_are_reported() {
        let err = Schema::builder()
            .add(TypeDecl::entity("app::A").extends("app::B"))
            .add(TypeDecl::entity("app::B").extends("app::A"))
            .build()
            .unwrap_err();

        let flat = routes(err);
        assert_eq!(flat.len(), 1);
        assert!(flat[0].1.starts_with("inheritance cycle: app::A -> app::B -> app::A"));
    }
}
