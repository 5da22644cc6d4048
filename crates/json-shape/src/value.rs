//! Native value model.
//!
//! `Native` is the decoded, strongly typed side of a field: what a coder
//! produces from a JSON value and consumes when encoding one back.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::entity::Instance;

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Uuid(Uuid),
    Entity(Instance),
    List(Vec<Native>),
    /// Raw JSON value passed through unconverted.
    Any(Value),
    /// Raw JSON object kept as an ordered map.
    Dict(Map<String, Value>),
}

impl Native {
    /// Returns the kind string identifier for this value.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Uuid(_) => "uuid",
            Self::Entity(_) => "entity",
            Self::List(_) => "list",
            Self::Any(_) => "any",
            Self::Dict(_) => "dict",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Instance> {
        match self {
            Self::Entity(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Native]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Native {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Native {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Native {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Native {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Native {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<NaiveDate> for Native {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for Native {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<Uuid> for Native {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<Instance> for Native {
    fn from(i: Instance) -> Self {
        Self::Entity(i)
    }
}

impl From<Vec<Native>> for Native {
    fn from(items: Vec<Native>) -> Self {
        Self::List(items)
    }
}

/// Returns the kind string for a raw JSON value, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_strings() {
        assert_eq!(Native::Str("a".into()).kind(), "string");
        assert_eq!(Native::Int(1).kind(), "integer");
        assert_eq!(Native::Float(1.5).kind(), "float");
        assert_eq!(Native::Bool(true).kind(), "boolean");
        assert_eq!(Native::List(vec![]).kind(), "list");
        assert_eq!(Native::Any(json!(null)).kind(), "any");
    }

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Native::from("abc").as_str(), Some("abc"));
        assert_eq!(Native::from(1312i64).as_int(), Some(1312));
        assert_eq!(Native::from(13.12).as_float(), Some(13.12));
        assert_eq!(Native::from(true).as_bool(), Some(true));
        assert_eq!(Native::from(1312i64).as_str(), None);
        assert_eq!(Native::from("abc").as_int(), None);
    }

    #[test]
    fn from_vec_builds_list() {
        let v = Native::from(vec![Native::Int(1), Native::Int(2)]);
        assert_eq!(v.as_list().map(|l| l.len()), Some(2));
    }

    #[test]
    fn json_kind_covers_all_shapes() {
        assert_eq!(json_kind(&json!(null)), "null");
        assert_eq!(json_kind(&json!(true)), "boolean");
        assert_eq!(json_kind(&json!(1)), "number");
        assert_eq!(json_kind(&json!("s")), "string");
        assert_eq!(json_kind(&json!([])), "array");
        assert_eq!(json_kind(&json!({})), "object");
    }

    #[test]
    fn uuid_round_trips_through_native() {
        let u = Uuid::parse_str("a629f931-0463-4b66-b9f3-f66b48deebb0").unwrap();
        assert_eq!(Native::from(u).as_uuid(), Some(u));
    }
}
