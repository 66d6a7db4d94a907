//! Schema validation orchestration and shared helpers.

pub mod graph;
pub mod naming;

use crate::{error::ErrorTree, node::Schema};

/// Run full schema validation in a staged, deterministic order.
pub(crate) fn validate_schema(schema: &Schema) -> Result<(), ErrorTree> {
    // Phase 1: validate each declaration (structural + local invariants).
    let mut errors = ErrorTree::new();
    for (path, decl) in schema.iter() {
        let mut errs = ErrorTree::new();
        naming::validate_type_decl(decl, &mut errs);
        errors.merge_for(path, errs);
    }

    // Phase 2: enforce schema-wide invariants.
    graph::validate_references(schema, &mut errors);
    graph::validate_acyclic(schema, &mut errors);

    errors.result()
}
