use crate::{
    Error,
    catalog::Resolution,
    error::SchemaError,
    property::{ExtensionRequest, Property, PropertyDescriptor, PropertyExtension, decl_types},
};
use classprop_schema::node::{PropertyDecl, Schema};
use std::sync::Arc;

///
/// Extractor
///
/// Turns declarations into descriptors for one type: own declarations in
/// source order, then the parent's list, then each capability's list.
/// Same-named entries are kept; lookups take the first.
///

pub(crate) struct Extractor<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) extension: Option<&'a dyn PropertyExtension>,
    pub(crate) marker: &'a str,
    pub(crate) resolution: Resolution,
}

impl Extractor<'_> {
    pub(crate) fn extract(&self, path: &str) -> Result<Vec<Arc<dyn Property>>, Error> {
        if !self.schema.contains(path) {
            return Err(SchemaError::UnknownType(path.to_string()).into());
        }

        let mut out = Vec::new();
        self.collect(path, &mut out)?;

        Ok(out)
    }

    fn collect(&self, path: &str, out: &mut Vec<Arc<dyn Property>>) -> Result<(), Error> {
        let Some(decl) = self.schema.get(path) else {
            return Ok(());
        };

        for prop in &decl.properties {
            out.push(self.descriptor(path, prop)?);
        }

        for ancestor in decl.ancestors() {
            self.collect(ancestor, out)?;
        }

        Ok(())
    }

    fn descriptor(&self, owner: &str, decl: &PropertyDecl) -> Result<Arc<dyn Property>, Error> {
        if let Some(extension) = self.delegate_for(decl) {
            let types = decl_types(decl)?;
            let description = full_body(decl);

            return extension.create(ExtensionRequest {
                owner,
                name: &decl.name,
                types: &types[..types.len().min(2)],
                permission: decl.permission,
                description: &description,
            });
        }

        let descriptor = PropertyDescriptor::from_decl(owner, decl)?;

        Ok(Arc::new(descriptor))
    }

    fn delegate_for(&self, decl: &PropertyDecl) -> Option<&dyn PropertyExtension> {
        if self.resolution != Resolution::Extended {
            return None;
        }

        self.extension.filter(|ext| {
            let marker = ext.marker().unwrap_or(self.marker);
            decl.mentions_tag(marker)
        })
    }
}

/// Body text with explicit tags rendered back into `@tag value` form.
fn full_body(decl: &PropertyDecl) -> String {
    let mut out = decl.body.trim().to_string();
    for (name, value) in &decl.extra_tags {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push('@');
        out.push_str(name);
        if let Some(value) = value {
            out.push(' ');
            out.push_str(value);
        }
    }

    out
}

///
/// TESTS
///
