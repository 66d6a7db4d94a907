use crate::{
    error::SchemaError,
    property::Property,
    validate::ValidationError,
    value::Value,
};
use derive_more::Display;
use regex::Regex;

///
/// ConditionKind
///
/// Closed set of validation tags. Anything else on a descriptor is left to
/// other consumers.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum ConditionKind {
    #[display("between")]
    Between,
    #[display("int")]
    Int,
    #[display("matches")]
    Matches,
    #[display("max")]
    Max,
    #[display("max-length")]
    MaxLength,
    #[display("mediumint")]
    Mediumint,
    #[display("min")]
    Min,
    #[display("min-length")]
    MinLength,
    #[display("not-empty")]
    NotEmpty,
    #[display("one-of")]
    OneOf,
    #[display("smallint")]
    Smallint,
    #[display("tinyint")]
    Tinyint,
    #[display("unsigned")]
    Unsigned,
}

const TAGS: [(&str, ConditionKind); 13] = [
    ("max", ConditionKind::Max),
    ("min", ConditionKind::Min),
    ("between", ConditionKind::Between),
    ("max-length", ConditionKind::MaxLength),
    ("min-length", ConditionKind::MinLength),
    ("matches", ConditionKind::Matches),
    ("not-empty", ConditionKind::NotEmpty),
    ("unsigned", ConditionKind::Unsigned),
    ("tinyint", ConditionKind::Tinyint),
    ("smallint", ConditionKind::Smallint),
    ("mediumint", ConditionKind::Mediumint),
    ("int", ConditionKind::Int),
    ("one-of", ConditionKind::OneOf),
];

impl ConditionKind {
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        TAGS.iter().find(|(name, _)| *name == tag).map(|(_, kind)| *kind)
    }
}

///
/// IntWidth
///
/// Column-width presets. Unsigned ranges are `0..=2^(8*bytes)-1`; the
/// signed `int` range is `-2147483647..=2147483648`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IntWidth {
    Tiny,
    Small,
    Medium,
    Int,
}

impl IntWidth {
    #[must_use]
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Tiny => 1,
            Self::Small => 2,
            Self::Medium => 3,
            Self::Int => 4,
        }
    }

    #[must_use]
    pub const fn bounds(self, unsigned: bool) -> (i64, i64) {
        if unsigned {
            return (0, (1_i64 << (8 * self.bytes())) - 1);
        }

        match self {
            Self::Tiny => (-128, 127),
            Self::Small => (-32_768, 32_767),
            Self::Medium => (-8_388_608, 8_388_607),
            Self::Int => (-2_147_483_647, 2_147_483_648),
        }
    }
}

///
/// Rule
///

#[derive(Clone, Debug)]
#[remain::sorted]
pub enum Rule {
    Enumeration(Vec<Value>),
    LowerBound(f64),
    MaxLength(usize),
    MinLength(usize),
    NonEmpty,
    Pattern(Regex),
    Range { min: f64, max: f64 },
    UpperBound(f64),
}

///
/// Condition
///
/// One rule bound to the descriptor it came from. Built fresh from the
/// descriptor's tags on every validation.
///

#[derive(Clone, Debug)]
pub struct Condition<'a> {
    property: &'a dyn Property,
    rule: Rule,
}

impl<'a> Condition<'a> {
    /// Conditions for every validation tag on `property`, in tag order.
    pub fn build(property: &'a dyn Property) -> Result<Vec<Self>, SchemaError> {
        property
            .tags()
            .iter()
            .filter_map(|(tag, value)| ConditionKind::from_tag(tag).map(|kind| (kind, value)))
            .map(|(kind, value)| {
                Rule::parse(property, kind, value).map(|rule| Self { property, rule })
            })
            .collect()
    }

    #[must_use]
    pub const fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn verify(&self, value: &Value) -> Result<(), ValidationError> {
        let name = self.property.name();

        match &self.rule {
            Rule::LowerBound(min) => {
                let n = self.numeric(value, true)?;
                if n < *min {
                    return Err(self.user(format!("{value} is less than {min} for {name}")));
                }
            }
            Rule::UpperBound(max) => {
                let n = self.numeric(value, false)?;
                if n > *max {
                    return Err(self.user(format!("{value} is larger than {max} for {name}")));
                }
            }
            Rule::Range { min, max } => {
                let n = self.numeric(value, false)?;
                if n < *min {
                    return Err(self.user(format!("{value} is less than {min} for {name}")));
                }
                if n > *max {
                    return Err(self.user(format!("{value} is larger than {max} for {name}")));
                }
            }
            Rule::MaxLength(limit) => match self.length(value)? {
                Some(Length::Chars(len)) if len > *limit => {
                    return Err(self.user(format!(
                        "{value} is longer than {limit} characters for {name}"
                    )));
                }
                Some(Length::Elements(len)) if len > *limit => {
                    return Err(self.user(format!("{name} has more than {limit} elements")));
                }
                _ => {}
            },
            Rule::MinLength(limit) => self.check_min_length(value, *limit)?,
            Rule::NonEmpty => self
                .check_min_length(value, 1)
                .map_err(|err| match err {
                    ValidationError::User { .. } => self.user(format!("{name} was empty")),
                    internal @ ValidationError::Internal { .. } => internal,
                })?,
            Rule::Pattern(re) => {
                let Some(text) = value.as_text() else {
                    return Err(self.internal(format!("Non-string value was passed for {name}")));
                };
                if !re.is_match(text) {
                    return Err(self.user(format!(
                        "{} did not match the required pattern /{re}/ for {name}",
                        value.to_json()
                    )));
                }
            }
            Rule::Enumeration(allowed) => {
                if !allowed.iter().any(|candidate| value.loose_eq(candidate)) {
                    let list = allowed
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(self.user(format!(
                        "{} was not one of {list} for {name}",
                        value.to_json()
                    )));
                }
            }
        }

        Ok(())
    }

    fn check_min_length(&self, value: &Value, limit: usize) -> Result<(), ValidationError> {
        let name = self.property.name();

        match self.length(value)? {
            Some(Length::Chars(len)) if len < limit => Err(self.user(format!(
                "{} is shorter than {limit} characters for {name}",
                value.to_json()
            ))),
            Some(Length::Elements(len)) if len < limit => {
                Err(self.user(format!("{name} has fewer than {limit} elements")))
            }
            _ => Ok(()),
        }
    }

    fn numeric(&self, value: &Value, show_value: bool) -> Result<f64, ValidationError> {
        value.as_number().ok_or_else(|| {
            let name = self.property.name();
            if show_value {
                self.internal(format!(
                    "Non-numeric value {} was passed for {name}",
                    value.to_json()
                ))
            } else {
                self.internal(format!("Non-numeric value was passed for {name}"))
            }
        })
    }

    /// `None` for resources, whose length is not observable.
    fn length(&self, value: &Value) -> Result<Option<Length>, ValidationError> {
        match value {
            Value::Resource(_) => Ok(None),
            Value::Text(s) => Ok(Some(Length::Chars(s.chars().count()))),
            Value::List(items) => Ok(Some(Length::Elements(items.len()))),
            Value::Map(entries) => Ok(Some(Length::Elements(entries.len()))),
            _ => Err(self.internal(format!(
                "Non-array, non-string value was passed for {}",
                self.property.name()
            ))),
        }
    }

    fn user(&self, message: String) -> ValidationError {
        ValidationError::User {
            property: self.property.name().to_string(),
            message,
        }
    }

    fn internal(&self, message: String) -> ValidationError {
        ValidationError::Internal {
            property: self.property.name().to_string(),
            message,
        }
    }
}

enum Length {
    Chars(usize),
    Elements(usize),
}

impl Rule {
    fn parse(
        property: &dyn Property,
        kind: ConditionKind,
        value: Option<&str>,
    ) -> Result<Self, SchemaError> {
        let args = Args {
            property,
            kind,
            value,
            positional: value.unwrap_or("").split_whitespace().collect(),
        };

        let rule = match kind {
            ConditionKind::Min => Self::LowerBound(args.number(0)?),
            ConditionKind::Max => Self::UpperBound(args.number(0)?),
            ConditionKind::Between => Self::Range {
                min: args.number(0)?,
                max: args.number(1)?,
            },
            ConditionKind::Unsigned => Self::LowerBound(0.0),
            ConditionKind::MaxLength => Self::MaxLength(args.length(0)?),
            ConditionKind::MinLength => Self::MinLength(args.length(0)?),
            ConditionKind::NotEmpty => Self::NonEmpty,
            ConditionKind::Matches => Self::Pattern(args.pattern(0)?),
            ConditionKind::OneOf => Self::Enumeration(args.list()?),
            ConditionKind::Tinyint => Self::preset(IntWidth::Tiny, property),
            ConditionKind::Smallint => Self::preset(IntWidth::Small, property),
            ConditionKind::Mediumint => Self::preset(IntWidth::Medium, property),
            ConditionKind::Int => Self::preset(IntWidth::Int, property),
        };

        Ok(rule)
    }

    /// Width preset; the unsigned range applies when `@unsigned` is present.
    fn preset(width: IntWidth, property: &dyn Property) -> Self {
        let (min, max) = width.bounds(property.has_tag("unsigned"));

        Self::Range {
            min: widen(min),
            max: widen(max),
        }
    }
}

#[expect(clippy::cast_precision_loss)]
const fn widen(n: i64) -> f64 {
    n as f64
}

///
/// Args
///
/// Tag value split on whitespace; each positional argument is a JSON
/// literal. `one-of` reads the whole value instead.
///

struct Args<'a> {
    property: &'a dyn Property,
    kind: ConditionKind,
    value: Option<&'a str>,
    positional: Vec<&'a str>,
}

impl Args<'_> {
    fn invalid(&self, reason: impl Into<String>) -> SchemaError {
        SchemaError::invalid_tag(
            self.property.name(),
            &self.kind.to_string(),
            self.value,
            reason,
        )
    }

    fn literal(&self, index: usize) -> Result<Value, SchemaError> {
        let raw = self
            .positional
            .get(index)
            .ok_or_else(|| self.invalid(format!("missing argument {}", index + 1)))?;

        Value::parse_json(raw).map_err(|err| self.invalid(err.to_string()))
    }

    fn number(&self, index: usize) -> Result<f64, SchemaError> {
        self.literal(index)?
            .as_number()
            .ok_or_else(|| self.invalid(format!("argument {} is not a number", index + 1)))
    }

    fn length(&self, index: usize) -> Result<usize, SchemaError> {
        self.literal(index)?
            .as_int()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                self.invalid(format!(
                    "argument {} is not a non-negative integer",
                    index + 1
                ))
            })
    }

    fn pattern(&self, index: usize) -> Result<Regex, SchemaError> {
        let literal = self.literal(index)?;
        let Some(source) = literal.as_text() else {
            return Err(self.invalid("pattern must be a JSON string"));
        };

        Regex::new(source).map_err(|err| self.invalid(err.to_string()))
    }

    fn list(&self) -> Result<Vec<Value>, SchemaError> {
        let raw = self
            .value
            .ok_or_else(|| self.invalid("missing JSON array"))?;

        match Value::parse_json(raw) {
            Ok(Value::List(items)) => Ok(items),
            Ok(_) => Err(self.invalid("expected a JSON array")),
            Err(err) => Err(self.invalid(err.to_string())),
        }
    }
}
