use crate::value::Value;

/// Numeric reading of a value; text counts when it parses as a finite number.
#[expect(clippy::cast_precision_loss)]
pub(super) fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Text(s) => numeric_text(s),
        _ => None,
    }
}

fn numeric_text(s: &str) -> Option<f64> {
    let s = s.trim();
    let leading = |c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.');
    if !s.starts_with(leading) {
        return None;
    }

    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Loose equality used by enumeration rules.
pub(super) fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => {
            a == b || matches!((numeric_text(a), numeric_text(b)), (Some(x), Some(y)) if x == y)
        }
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loose_eq(x, y))
        }
        _ => match (numeric(left), numeric(right)) {
            (Some(x), Some(y)) => x == y,
            _ => left == right,
        },
    }
}
