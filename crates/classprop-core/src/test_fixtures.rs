use crate::{catalog::Catalog, value::Value};
use classprop_schema::node::{PropertyDecl, SELF_IDENTIFIED, Schema, TypeDecl};

pub(crate) mod paths {
    pub(crate) const NAMED: &str = "demo::Named";
    pub(crate) const BASE: &str = "demo::Base";
    pub(crate) const USER: &str = "demo::User";
    pub(crate) const ADMIN: &str = "demo::Admin";
    pub(crate) const MEMBERSHIP: &str = "demo::Membership";
    pub(crate) const BROKEN: &str = "demo::Broken";
    pub(crate) const PLUGIN: &str = "demo::Plugin";
    pub(crate) const CSV_PLUGIN: &str = "demo::CsvPlugin";
}

pub(crate) fn schema() -> Schema {
    Schema::builder()
        .add(
            TypeDecl::capability(paths::NAMED).property(
                PropertyDecl::read_write("Name", "string")
                    .body("Display name @not-empty @max-length 40"),
            ),
        )
        .add(
            TypeDecl::entity(paths::BASE).abstract_type().property(
                PropertyDecl::read_write("Id", "int").body("Row id @identifier @unsigned @int"),
            ),
        )
        .add(
            TypeDecl::entity(paths::USER)
                .extends(paths::BASE)
                .implements(paths::NAMED)
                .property(PropertyDecl::read_write("Nickname", "string|null").body("@max-length 20"))
                .property(
                    PropertyDecl::read_write("Email", "string")
                        .body(r#"Contact address @matches "^[^@\\s]+@[^@\\s]+$""#),
                )
                .property(PropertyDecl::read_write("Age", "int|null").body("@between 0 150"))
                .property(PropertyDecl::read_write("Level", "int").body("@tinyint @unsigned @default 1"))
                .property(
                    PropertyDecl::read_write("Role", "string")
                        .body(r#"@one-of ["admin","editor","viewer"] @default "viewer""#),
                )
                .property(PropertyDecl::read_write("Tags", "string[]").body("@max-length 3"))
                .property(PropertyDecl::read_write("Active", "bool").body("@default true"))
                .property(PropertyDecl::read_write("Joined", "DateTime"))
                .property(PropertyDecl::read_write("Score", "float|int").body("@min 0 @max 100"))
                .property(PropertyDecl::write_only("Password", "string").body("@min-length 8"))
                .property(PropertyDecl::read_only("Label", "string").body("Name and email")),
        )
        .add(
            TypeDecl::entity(paths::ADMIN).extends(paths::USER).property(
                PropertyDecl::read_write("Role", "string")
                    .body(r#"@one-of ["admin"] @default "admin""#),
            ),
        )
        .add(
            TypeDecl::entity(paths::MEMBERSHIP)
                .property(PropertyDecl::read_write("Member", paths::USER))
                .property(PropertyDecl::read_write("Note", "string|null"))
                .property(PropertyDecl::read_write("Since", "DateTime")),
        )
        .add(
            TypeDecl::entity(paths::BROKEN)
                .property(PropertyDecl::read_write("Id", "int"))
                .property(PropertyDecl::read_write("Rank", "int"))
                .property(PropertyDecl::read_write("Limit", "int").body("@max lots"))
                .property(PropertyDecl::read_write("Fallback", "int").body("@default {oops"))
                .property(PropertyDecl::read_write("Blank", "int").body("@default")),
        )
        .add(
            TypeDecl::entity(paths::PLUGIN)
                .extends(SELF_IDENTIFIED)
                .abstract_type()
                .property(PropertyDecl::read_write("Enabled", "bool").body("@default false"))
                .property(PropertyDecl::read_write("Options", "array")),
        )
        .add(
            TypeDecl::entity(paths::CSV_PLUGIN)
                .extends(paths::PLUGIN)
                .property(PropertyDecl::read_write("Delimiter", "string|null").body("@max-length 1")),
        )
        .build()
        .unwrap()
}

/// Catalog over [`schema`] with the demo accessor overrides:
/// a lowercasing `Email` setter, a computed `Label` getter, and a `Rank`
/// getter that breaks its declared type.
pub(crate) fn catalog() -> Catalog {
    Catalog::builder(schema())
        .setter(paths::USER, "Email", |inst, value| {
            let lowered = value.as_text().unwrap_or_default().to_lowercase();
            inst.store_raw("Email", Value::Text(lowered));
            Ok(())
        })
        .getter(paths::USER, "Label", |inst| {
            let text = |name: &str| {
                inst.stored(name)
                    .and_then(Value::as_text)
                    .unwrap_or_default()
                    .to_string()
            };
            Ok(Value::Text(format!("{} <{}>", text("Name"), text("Email"))))
        })
        .getter(paths::BROKEN, "Rank", |_| Ok(Value::from("high")))
        .build()
        .unwrap()
}
