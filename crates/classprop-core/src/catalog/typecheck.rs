use crate::value::Value;
use classprop_schema::{
    node::Schema,
    types::{Primitive, TypeToken},
};

/// Whether `child` is `ancestor` or reaches it through parent and
/// capability edges.
pub(crate) fn is_descendant(schema: &Schema, child: &str, ancestor: &str) -> bool {
    if child == ancestor {
        return schema.contains(child);
    }

    schema.get(child).is_some_and(|decl| {
        decl.ancestors()
            .any(|next| is_descendant(schema, next, ancestor))
    })
}

/// Structural check: `value` matches at least one declared token.
pub(crate) fn matches_any(schema: &Schema, tokens: &[TypeToken], value: &Value) -> bool {
    tokens.iter().any(|token| matches_token(schema, token, value))
}

fn matches_token(schema: &Schema, token: &TypeToken, value: &Value) -> bool {
    match token {
        TypeToken::Primitive(prim) => matches_primitive(*prim, value),
        TypeToken::Path(path) => value
            .as_entity()
            .is_some_and(|inst| is_descendant(schema, inst.path(), path)),
        TypeToken::ListOf(inner) => match value {
            Value::List(items) | Value::Stream(items) => {
                items.iter().all(|item| matches_token(schema, inner, item))
            }
            Value::Map(entries) => entries
                .iter()
                .all(|(_, item)| matches_token(schema, inner, item)),
            _ => false,
        },
    }
}

const fn matches_primitive(prim: Primitive, value: &Value) -> bool {
    match prim {
        Primitive::Array => matches!(value, Value::List(_) | Value::Map(_)),
        Primitive::Bool => matches!(value, Value::Bool(_)),
        Primitive::DateTime => matches!(value, Value::Timestamp(_)),
        Primitive::Float => matches!(value, Value::Float(_)),
        Primitive::Int => matches!(value, Value::Int(_)),
        Primitive::Iterator => matches!(value, Value::Stream(_)),
        Primitive::Mixed => true,
        Primitive::Null => value.is_null(),
        Primitive::Resource => matches!(value, Value::Resource(_)),
        Primitive::Text => matches!(value, Value::Text(_)),
    }
}

///
/// TESTS
///
