mod compare;
mod json;


use crate::accessor::Instance;
use derive_more::Display;
use time::OffsetDateTime;

///
/// Value
///
/// Runtime value of one property. The variant is the kind discriminant the
/// structural type check runs against.
///
/// Map     → ordered string-keyed array; insertion order is kept.
/// Stream  → iterator-typed value; only ever consumed as a whole.
/// Resource → opaque handle whose length is not observable.
///

#[derive(Clone, Debug, PartialEq)]
#[remain::sorted]
pub enum Value {
    Bool(bool),
    Entity(Box<Instance>),
    Float(f64),
    Int(i64),
    List(Vec<Self>),
    Map(Vec<(String, Self)>),
    Null,
    Resource(Resource),
    Stream(Vec<Self>),
    Text(String),
    Timestamp(OffsetDateTime),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from owned items.
    pub fn from_list<T: Into<Self>>(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a `Value::Map` from owned entries, keeping their order.
    pub fn from_map<K: Into<String>, T: Into<Self>>(entries: Vec<(K, T)>) -> Self {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// An exhausted iterator value.
    #[must_use]
    pub const fn empty_stream() -> Self {
        Self::Stream(Vec::new())
    }

    /// Unix epoch timestamp.
    #[must_use]
    pub const fn epoch() -> Self {
        Self::Timestamp(OffsetDateTime::UNIX_EPOCH)
    }

    ///
    /// TYPES
    ///

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Entity(_) => ValueKind::Entity,
            Self::Float(_) => ValueKind::Float,
            Self::Int(_) => ValueKind::Int,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Null => ValueKind::Null,
            Self::Resource(_) => ValueKind::Resource,
            Self::Stream(_) => ValueKind::Stream,
            Self::Text(_) => ValueKind::Text,
            Self::Timestamp(_) => ValueKind::Timestamp,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    ///
    /// CONVERSION
    ///

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        if let Self::Int(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        if let Self::Float(f) = self {
            Some(*f)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&[Self]> {
        if let Self::List(xs) = self {
            Some(xs.as_slice())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&[(String, Self)]> {
        if let Self::Map(entries) = self {
            Some(entries.as_slice())
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_entity(&self) -> Option<&Instance> {
        if let Self::Entity(inst) = self {
            Some(inst)
        } else {
            None
        }
    }

    /// Numeric reading used by numeric rules: ints, floats, and numeric text.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        compare::numeric(self)
    }

    /// Loose equality: numbers and numeric strings compare numerically.
    #[must_use]
    pub fn loose_eq(&self, other: &Self) -> bool {
        compare::loose_eq(self, other)
    }
}

///
/// ValueKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum ValueKind {
    Bool,
    Entity,
    Float,
    Int,
    List,
    Map,
    Null,
    Resource,
    Stream,
    Text,
    Timestamp,
}

///
/// Resource
///
/// Opaque external handle (file, socket, stream). Carried by value only.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("resource #{_0}")]
pub struct Resource(u64);

impl Resource {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

///
/// From impls
///

macro_rules! impl_from_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Instance> for Value {
    fn from(v: Instance) -> Self {
        Self::Entity(Box::new(v))
    }
}

impl From<OffsetDateTime> for Value {
    fn from(v: OffsetDateTime) -> Self {
        Self::Timestamp(v)
    }
}

impl From<Resource> for Value {
    fn from(v: Resource) -> Self {
        Self::Resource(v)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::from_list(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
