use crate::node::{PropertyDecl, TypeDecl};

/// Path of the built-in base for types whose identity is their own type path.
pub const SELF_IDENTIFIED: &str = "classprop::SelfIdentified";

/// Property on [`SELF_IDENTIFIED`] that reports the instance's type path.
pub const CLASSNAME_PROPERTY: &str = "Classname";

/// Declaration of the built-in self-identified base type.
#[must_use]
pub fn self_identified() -> TypeDecl {
    TypeDecl::entity(SELF_IDENTIFIED)
        .abstract_type()
        .property(
            PropertyDecl::read_only(CLASSNAME_PROPERTY, "string")
                .body("Type path of this object @primary-key"),
        )
}
