//! Per-type bidirectional coders.
//!
//! A `Coder` is the pair of pure conversion functions attached to a field:
//! `decode` turns a JSON value into a `Native` value, `encode` turns it back.
//! The closed set of variants is selected when the schema is declared; there
//! is no runtime type sniffing beyond matching the incoming JSON shape.
//!
//! Both directions take the field's wire name so every failure is attributed
//! to the field that produced it.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value;
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::ShapeError;
use crate::value::{json_kind, Native};

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";
const DATETIME_NAIVE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATETIME_OUT_UTC: &str = "%Y-%m-%dT%H:%M:%SZ";
const DATETIME_OUT_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%z";

/// The conversion applied to one field's value, in both directions.
#[derive(Debug, Clone)]
pub enum Coder {
    Str,
    Int,
    Float,
    Bool,
    Date,
    DateTime,
    Uuid,
    /// Raw JSON value passed through unconverted.
    Any,
    /// Raw JSON object kept as an ordered map.
    Dict,
    /// A nested entity, decoded recursively.
    Nested(Arc<Entity>),
    /// A homogeneous array of the element coder.
    List(Box<Coder>),
}

impl Coder {
    /// The JSON shape this coder expects, for error messages.
    pub fn expected(&self) -> &'static str {
        match self {
            Self::Str | Self::Date | Self::DateTime | Self::Uuid => "string",
            Self::Int => "integer",
            Self::Float => "number",
            Self::Bool => "boolean",
            Self::Any => "value",
            Self::Dict | Self::Nested(_) => "object",
            Self::List(_) => "array",
        }
    }

    /// Decodes a non-null JSON value into a native value.
    ///
    /// `field` is the wire name used for error attribution.
    pub fn decode(&self, field: &str, value: &Value) -> Result<Native, ShapeError> {
        match self {
            Self::Str => match value {
                Value::String(s) => Ok(Native::Str(s.clone())),
                other => Err(self.mismatch(field, other)),
            },
            Self::Int => match value {
                Value::Number(n) => decode_int(field, n),
                other => Err(self.mismatch(field, other)),
            },
            Self::Float => match value {
                Value::Number(n) => match n.as_f64() {
                    Some(f) => Ok(Native::Float(f)),
                    None => Err(ShapeError::MalformedValue {
                        field: field.to_string(),
                        reason: format!("number {n} is not representable as f64"),
                    }),
                },
                other => Err(self.mismatch(field, other)),
            },
            Self::Bool => match value {
                Value::Bool(b) => Ok(Native::Bool(*b)),
                other => Err(self.mismatch(field, other)),
            },
            Self::Date => match value {
                Value::String(s) => decode_date(field, s),
                other => Err(self.mismatch(field, other)),
            },
            Self::DateTime => match value {
                Value::String(s) => decode_datetime(field, s),
                other => Err(self.mismatch(field, other)),
            },
            Self::Uuid => match value {
                Value::String(s) => Uuid::parse_str(s).map(Native::Uuid).map_err(|e| {
                    ShapeError::MalformedValue {
                        field: field.to_string(),
                        reason: format!("bad uuid `{s}`: {e}"),
                    }
                }),
                other => Err(self.mismatch(field, other)),
            },
            Self::Any => Ok(Native::Any(value.clone())),
            Self::Dict => match value {
                Value::Object(map) => Ok(Native::Dict(map.clone())),
                other => Err(self.mismatch(field, other)),
            },
            Self::Nested(entity) => match value {
                Value::Object(_) => entity
                    .from_json(value)
                    .map(Native::Entity)
                    .map_err(|e| ShapeError::nest(field, e)),
                other => Err(self.mismatch(field, other)),
            },
            Self::List(element) => match value {
                Value::Array(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        let slot = format!("{field}[{i}]");
                        if item.is_null() {
                            return Err(ShapeError::NullNotAllowed { field: slot });
                        }
                        out.push(element.decode(&slot, item)?);
                    }
                    Ok(Native::List(out))
                }
                other => Err(self.mismatch(field, other)),
            },
        }
    }

    /// Encodes a native value back to JSON.
    pub fn encode(&self, field: &str, value: &Native) -> Result<Value, ShapeError> {
        match (self, value) {
            (Self::Str, Native::Str(s)) => Ok(Value::String(s.clone())),
            (Self::Int, Native::Int(n)) => Ok(Value::from(*n)),
            (Self::Float, Native::Float(f)) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .ok_or_else(|| ShapeError::MalformedValue {
                    field: field.to_string(),
                    reason: format!("non-finite float {f}"),
                }),
            // Ints are valid floats on the wire, as on decode.
            (Self::Float, Native::Int(n)) => Ok(Value::from(*n)),
            (Self::Bool, Native::Bool(b)) => Ok(Value::Bool(*b)),
            (Self::Date, Native::Date(d)) => Ok(Value::String(d.format(DATE_FMT).to_string())),
            (Self::DateTime, Native::DateTime(dt)) => Ok(Value::String(encode_datetime(dt))),
            (Self::Uuid, Native::Uuid(u)) => Ok(Value::String(u.hyphenated().to_string())),
            (Self::Any, Native::Any(v)) => Ok(v.clone()),
            (Self::Dict, Native::Dict(map)) => Ok(Value::Object(map.clone())),
            (Self::Nested(_), Native::Entity(instance)) => instance
                .to_json()
                .map_err(|e| ShapeError::nest(field, e)),
            (Self::List(element), Native::List(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    out.push(element.encode(&format!("{field}[{i}]"), item)?);
                }
                Ok(Value::Array(out))
            }
            (_, other) => Err(ShapeError::TypeMismatch {
                field: field.to_string(),
                expected: self.expected(),
                actual: other.kind(),
            }),
        }
    }

    fn mismatch(&self, field: &str, actual: &Value) -> ShapeError {
        ShapeError::TypeMismatch {
            field: field.to_string(),
            expected: self.expected(),
            actual: json_kind(actual),
        }
    }
}

fn decode_int(field: &str, n: &serde_json::Number) -> Result<Native, ShapeError> {
    if let Some(i) = n.as_i64() {
        return Ok(Native::Int(i));
    }
    // A u64-only value is always above i64::MAX.
    if n.as_u64().is_some() {
        return Err(ShapeError::MalformedValue {
            field: field.to_string(),
            reason: format!("number {n} is out of integer range"),
        });
    }
    let Some(f) = n.as_f64() else {
        return Err(ShapeError::MalformedValue {
            field: field.to_string(),
            reason: format!("number {n} is out of integer range"),
        });
    };
    if f.fract() != 0.0 {
        return Err(ShapeError::MalformedValue {
            field: field.to_string(),
            reason: format!("number {n} has a fractional part"),
        });
    }
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range, so
    // the upper bound is exclusive; i64::MIN as f64 is exact.
    if f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return Err(ShapeError::MalformedValue {
            field: field.to_string(),
            reason: format!("number {n} is out of integer range"),
        });
    }
    Ok(Native::Int(f as i64))
}

fn decode_date(field: &str, s: &str) -> Result<Native, ShapeError> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map(Native::Date)
        .map_err(|_| ShapeError::MalformedValue {
            field: field.to_string(),
            reason: format!("bad date `{s}`, expected YYYY-MM-DD"),
        })
}

/// Parses an ISO-8601 timestamp.
///
/// Accepted offset spellings: trailing `Z`, `±hh:mm`, `±hhmm`, or none at
/// all (a naive timestamp is taken as UTC). Fractional seconds are optional.
fn decode_datetime(field: &str, s: &str) -> Result<Native, ShapeError> {
    let normalized = if let Some(stripped) = s.strip_suffix(['Z', 'z']) {
        format!("{stripped}+0000")
    } else {
        s.to_string()
    };
    if let Ok(dt) = DateTime::parse_from_str(&normalized, DATETIME_FMT) {
        return Ok(Native::DateTime(dt));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, DATETIME_NAIVE_FMT) {
        return Ok(Native::DateTime(naive.and_utc().fixed_offset()));
    }
    Err(ShapeError::MalformedValue {
        field: field.to_string(),
        reason: format!("bad timestamp `{s}`"),
    })
}

/// Formats a timestamp back out: `...Z` for UTC, `...±hhmm` otherwise.
fn encode_datetime(dt: &DateTime<FixedOffset>) -> String {
    if dt.offset().local_minus_utc() == 0 {
        dt.format(DATETIME_OUT_UTC).to_string()
    } else {
        dt.format(DATETIME_OUT_OFFSET).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    #[test]
    fn str_accepts_only_strings() {
        assert_eq!(
            Coder::Str.decode("bar", &json!("bar")).unwrap(),
            Native::Str("bar".into())
        );
        let err = Coder::Str.decode("bar", &json!(123)).unwrap_err();
        assert_eq!(
            err,
            ShapeError::TypeMismatch {
                field: "bar".into(),
                expected: "string",
                actual: "number",
            }
        );
    }

    #[test]
    fn int_rejects_strings_and_fractions() {
        assert_eq!(
            Coder::Int.decode("bar", &json!(1312)).unwrap(),
            Native::Int(1312)
        );
        assert!(matches!(
            Coder::Int.decode("bar", &json!("1312")).unwrap_err(),
            ShapeError::TypeMismatch { .. }
        ));
        assert!(matches!(
            Coder::Int.decode("bar", &json!(13.12)).unwrap_err(),
            ShapeError::MalformedValue { .. }
        ));
    }

    #[test]
    fn int_accepts_whole_floats() {
        assert_eq!(
            Coder::Int.decode("bar", &json!(13.0)).unwrap(),
            Native::Int(13)
        );
    }

    #[test]
    fn int_rejects_out_of_range() {
        assert!(matches!(
            Coder::Int.decode("bar", &json!(u64::MAX)).unwrap_err(),
            ShapeError::MalformedValue { .. }
        ));
        // 2^63, one past i64::MAX: must not saturate to a wrong value
        assert!(matches!(
            Coder::Int
                .decode("bar", &json!(9_223_372_036_854_775_808u64))
                .unwrap_err(),
            ShapeError::MalformedValue { .. }
        ));
        // same boundary arriving as a float
        assert!(matches!(
            Coder::Int
                .decode("bar", &json!(9.223372036854776e18))
                .unwrap_err(),
            ShapeError::MalformedValue { .. }
        ));
        assert!(matches!(
            Coder::Int.decode("bar", &json!(-9.3e18)).unwrap_err(),
            ShapeError::MalformedValue { .. }
        ));
    }

    #[test]
    fn int_accepts_extremes_of_range() {
        assert_eq!(
            Coder::Int.decode("bar", &json!(i64::MAX)).unwrap(),
            Native::Int(i64::MAX)
        );
        assert_eq!(
            Coder::Int.decode("bar", &json!(i64::MIN)).unwrap(),
            Native::Int(i64::MIN)
        );
    }

    #[test]
    fn float_widens_integers() {
        assert_eq!(
            Coder::Float.decode("bar", &json!(1312)).unwrap(),
            Native::Float(1312.0)
        );
        assert_eq!(
            Coder::Float.decode("bar", &json!(13.12)).unwrap(),
            Native::Float(13.12)
        );
        assert!(matches!(
            Coder::Float.decode("bar", &json!("123")).unwrap_err(),
            ShapeError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn bool_rejects_strings() {
        assert_eq!(
            Coder::Bool.decode("bar", &json!(true)).unwrap(),
            Native::Bool(true)
        );
        assert!(matches!(
            Coder::Bool.decode("bar", &json!("true")).unwrap_err(),
            ShapeError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn date_round_trip() {
        let decoded = Coder::Date.decode("bar", &json!("2018-01-02")).unwrap();
        assert_eq!(
            decoded,
            Native::Date(NaiveDate::from_ymd_opt(2018, 1, 2).unwrap())
        );
        assert_eq!(
            Coder::Date.encode("bar", &decoded).unwrap(),
            json!("2018-01-02")
        );
    }

    #[test]
    fn date_rejects_garbage() {
        assert!(matches!(
            Coder::Date.decode("bar", &json!("not-a-date")).unwrap_err(),
            ShapeError::MalformedValue { .. }
        ));
        assert!(matches!(
            Coder::Date.decode("bar", &json!(20180102)).unwrap_err(),
            ShapeError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn datetime_accepts_all_offset_spellings() {
        let spellings = [
            "2018-01-01T00:00:00+0000",
            "2018-01-01T00:00:00+00:00",
            "2018-01-01T00:00:00Z",
            "2018-01-01T00:00:00.000+0000",
            "2018-01-01T00:00:00.000+00:00",
            "2018-01-01T00:00:00.000Z",
        ];
        let expected = Coder::DateTime
            .decode("bar", &json!("2018-01-01T00:00:00Z"))
            .unwrap();
        for s in spellings {
            assert_eq!(
                Coder::DateTime.decode("bar", &json!(s)).unwrap(),
                expected,
                "spelling {s}"
            );
        }
    }

    #[test]
    fn datetime_naive_is_utc() {
        let decoded = Coder::DateTime
            .decode("bar", &json!("2018-01-01T12:30:00"))
            .unwrap();
        let dt = decoded.as_datetime().unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn datetime_encodes_utc_with_z() {
        let decoded = Coder::DateTime
            .decode("bar", &json!("2018-01-01T00:00:00+00:00"))
            .unwrap();
        assert_eq!(
            Coder::DateTime.encode("bar", &decoded).unwrap(),
            json!("2018-01-01T00:00:00Z")
        );
    }

    #[test]
    fn datetime_keeps_non_utc_offset() {
        let decoded = Coder::DateTime
            .decode("bar", &json!("2018-01-01T00:00:00+01:00"))
            .unwrap();
        assert_eq!(
            Coder::DateTime.encode("bar", &decoded).unwrap(),
            json!("2018-01-01T00:00:00+0100")
        );
    }

    #[test]
    fn datetime_rejects_garbage() {
        assert!(matches!(
            Coder::DateTime
                .decode("bar", &json!("not-a-date"))
                .unwrap_err(),
            ShapeError::MalformedValue { .. }
        ));
    }

    #[test]
    fn uuid_accepts_uppercase_emits_lowercase() {
        let canonical = "a629f931-0463-4b66-b9f3-f66b48deebb0";
        let decoded = Coder::Uuid
            .decode("bar", &json!(canonical.to_uppercase()))
            .unwrap();
        assert_eq!(Coder::Uuid.encode("bar", &decoded).unwrap(), json!(canonical));
    }

    #[test]
    fn uuid_rejects_garbage() {
        assert!(matches!(
            Coder::Uuid.decode("bar", &json!("not-a-uuid")).unwrap_err(),
            ShapeError::MalformedValue { .. }
        ));
    }

    #[test]
    fn any_passes_through() {
        let v = json!({"a": [1, 2, {"b": null}]});
        let decoded = Coder::Any.decode("bar", &v).unwrap();
        assert_eq!(Coder::Any.encode("bar", &decoded).unwrap(), v);
    }

    #[test]
    fn dict_requires_object() {
        let v = json!({"a": 1, "b": 2});
        let decoded = Coder::Dict.decode("bar", &v).unwrap();
        assert_eq!(Coder::Dict.encode("bar", &decoded).unwrap(), v);
        assert!(matches!(
            Coder::Dict.decode("bar", &json!([1, 2])).unwrap_err(),
            ShapeError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn list_preserves_order_and_empty_is_valid() {
        let decoded = Coder::List(Box::new(Coder::Int))
            .decode("bar", &json!([3, 1, 2]))
            .unwrap();
        assert_eq!(
            decoded,
            Native::List(vec![Native::Int(3), Native::Int(1), Native::Int(2)])
        );
        let empty = Coder::List(Box::new(Coder::Int))
            .decode("bar", &json!([]))
            .unwrap();
        assert_eq!(empty, Native::List(vec![]));
    }

    #[test]
    fn list_element_errors_carry_index() {
        let err = Coder::List(Box::new(Coder::Int))
            .decode("bar", &json!([1, "two"]))
            .unwrap_err();
        assert_eq!(err.path(), "bar[1]");
    }

    #[test]
    fn list_rejects_non_array() {
        assert!(matches!(
            Coder::List(Box::new(Coder::Int))
                .decode("bar", &json!({"0": 1}))
                .unwrap_err(),
            ShapeError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn encode_rejects_wrong_native_kind() {
        let err = Coder::Int.encode("bar", &Native::Str("1".into())).unwrap_err();
        assert_eq!(
            err,
            ShapeError::TypeMismatch {
                field: "bar".into(),
                expected: "integer",
                actual: "string",
            }
        );
    }

    #[test]
    fn encode_rejects_non_finite_float() {
        assert!(matches!(
            Coder::Float
                .encode("bar", &Native::Float(f64::NAN))
                .unwrap_err(),
            ShapeError::MalformedValue { .. }
        ));
    }
}
