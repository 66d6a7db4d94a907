use crate::{
    MAX_PROPERTY_NAME_LEN, MAX_TAG_NAME_LEN, MAX_TYPE_PATH_LEN, err,
    error::ErrorTree,
    node::{PropertyDecl, TypeDecl},
};
use std::collections::BTreeSet;

/// Validate one type declaration in isolation.
pub fn validate_type_decl(decl: &TypeDecl, errs: &mut ErrorTree) {
    if let Err(msg) = validate_type_path(&decl.path) {
        errs.add(msg);
    }

    let mut seen = BTreeSet::new();
    for prop in &decl.properties {
        if !seen.insert(prop.name.as_str()) {
            err!(errs, "property '{}' is declared more than once", prop.name);
        }

        let mut prop_errs = ErrorTree::new();
        validate_property_decl(prop, &mut prop_errs);
        errs.merge_for(prop.name.clone(), prop_errs);
    }
}

fn validate_property_decl(decl: &PropertyDecl, errs: &mut ErrorTree) {
    if let Err(msg) = validate_ident(&decl.name, MAX_PROPERTY_NAME_LEN) {
        err!(errs, "property name {msg}");
    }

    if let Err(e) = decl.type_tokens() {
        errs.add(e);
    }

    let (_, tags) = decl.parts();
    for (name, _) in tags.iter() {
        if let Err(msg) = validate_tag_name(name) {
            errs.add(msg);
        }
    }
}

/// Type paths are `::` separated identifiers; `\` is accepted as a separator.
pub(crate) fn validate_type_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("type path is empty".to_string());
    }
    if path.len() > MAX_TYPE_PATH_LEN {
        return Err(format!(
            "type path '{path}' exceeds max length {MAX_TYPE_PATH_LEN}"
        ));
    }

    for segment in path.split("::").flat_map(|s| s.split('\\')) {
        validate_ident(segment, MAX_TYPE_PATH_LEN)
            .map_err(|msg| format!("type path '{path}': segment {msg}"))?;
    }

    Ok(())
}

fn validate_ident(ident: &str, max_len: usize) -> Result<(), String> {
    if ident.is_empty() {
        return Err("is empty".to_string());
    }
    if ident.len() > max_len {
        return Err(format!("'{ident}' exceeds max length {max_len}"));
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(format!("'{ident}' must not start with a digit"));
    }
    if !ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("'{ident}' must be an ASCII identifier"));
    }

    Ok(())
}

fn validate_tag_name(name: &str) -> Result<(), String> {
    if name.len() > MAX_TAG_NAME_LEN {
        return Err(format!(
            "tag '{name}' exceeds max length {MAX_TAG_NAME_LEN}"
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(format!("tag '{name}' has invalid characters"));
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_paths_accept_both_separators() {
        assert!(validate_type_path("app::model::User").is_ok());
        assert!(validate_type_path("App\\Model\\User").is_ok());
        assert!(validate_type_path("").is_err());
        assert!(validate_type_path("app::").is_err());
        assert!(validate_type_path("app::9lives").is_err());
    }

    #[test]
    fn property_problems_are_routed_by_name() {
        let decl = TypeDecl::entity("app::User")
            .property(PropertyDecl::read_write("Name", "string"))
            .property(PropertyDecl::read_write("Name", "string"))
            .property(PropertyDecl::read_write("Bad Name", ""))
            .property(PropertyDecl::read_write("Age", "int").body("x @max!len 3"));

        let mut errs = ErrorTree::new();
        validate_type_decl(&decl, &mut errs);

        let routes: Vec<_> = errs.flatten().into_iter().map(|(r, _)| r).collect();
        assert_eq!(routes, vec!["", "Age", "Bad Name", "Bad Name"]);
    }
}
