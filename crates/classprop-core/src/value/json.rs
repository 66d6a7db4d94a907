use crate::value::Value;
use serde_json::{Map as JsonMap, Number, Value as Json};
use time::format_description::well_known::Rfc3339;

impl Value {
    /// Decode a structured literal, as stored in a `@default` tag.
    pub fn parse_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Json>(raw).map(Self::from_json)
    }

    #[must_use]
    pub fn from_json(json: Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
            Json::String(s) => Self::Text(s),
            Json::Array(items) => Self::List(items.into_iter().map(Self::from_json).collect()),
            Json::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// JSON rendering used in diagnostics and by persistence callers.
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Self::Bool(b) => Json::Bool(*b),
            Self::Entity(inst) => Json::Object(
                inst.values()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<JsonMap<_, _>>(),
            ),
            Self::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Self::Int(i) => Json::Number((*i).into()),
            Self::List(items) | Self::Stream(items) => {
                Json::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<JsonMap<_, _>>(),
            ),
            Self::Null => Json::Null,
            Self::Resource(r) => Json::String(r.to_string()),
            Self::Text(s) => Json::String(s.clone()),
            Self::Timestamp(t) => t
                .format(&Rfc3339)
                .map_or(Json::Null, Json::String),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Int(i) => write!(f, "{i}"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}
