//! Entity schema and the decode/encode engine.
//!
//! An `Entity` is an ordered collection of field descriptors describing one
//! JSON object shape. `from_json` resolves per-field presence policy
//! (absent / null / value) and delegates conversion to each field's coder;
//! `Instance::to_json` walks the same descriptors in the other direction.
//!
//! Schemas are built once, shared behind `Arc`, and never mutated, so
//! decode and encode are pure and freely concurrent.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::coder::Coder;
use crate::error::ShapeError;
use crate::field::Field;
use crate::presence::Presence;
use crate::value::{json_kind, Native};

/// A named, ordered JSON object shape.
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Entity {
    /// Declares an entity. Field order is declaration order and drives both
    /// decode iteration and encode output key order.
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            fields,
        })
    }

    fn field_index(&self, attr: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == attr)
    }

    /// A blank instance with every field `Absent`, for building values by
    /// hand on the encode side.
    pub fn instance(self: &Arc<Self>) -> Instance {
        Instance {
            entity: Arc::clone(self),
            values: vec![Presence::Absent; self.fields.len()],
        }
    }

    /// Decodes a JSON object into an instance.
    ///
    /// All-or-nothing: the first failing field aborts the decode. Unknown
    /// keys in the input are ignored.
    pub fn from_json(self: &Arc<Self>, value: &Value) -> Result<Instance, ShapeError> {
        let Value::Object(obj) = value else {
            return Err(ShapeError::TypeMismatch {
                field: self.name.clone(),
                expected: "object",
                actual: json_kind(value),
            });
        };

        let mut values = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let wire = field.wire_name();
            let slot = match obj.get(wire) {
                None => match &field.default {
                    // Defaults are already native values; no coder pass.
                    Some(default) => Presence::Present(default.clone()),
                    None if field.optional => Presence::Absent,
                    None => {
                        return Err(ShapeError::MissingField {
                            field: wire.to_string(),
                        })
                    }
                },
                // Explicit null wins over any declared default: the caller
                // said "no value", which is not the same as omitting the key.
                Some(Value::Null) if field.optional => Presence::Null,
                Some(Value::Null) => {
                    return Err(ShapeError::NullNotAllowed {
                        field: wire.to_string(),
                    })
                }
                Some(present) => Presence::Present(field.coder.decode(wire, present)?),
            };
            if let Presence::Present(native) = &slot {
                for validator in &field.validators {
                    validator.as_ref()(native).map_err(|reason| ShapeError::ValidationFailed {
                        field: wire.to_string(),
                        reason,
                    })?;
                }
            }
            values.push(slot);
        }

        Ok(Instance {
            entity: Arc::clone(self),
            values,
        })
    }

    /// Validates schema integrity, in the spirit of a definition-time check.
    ///
    /// Returns a short error code on the first problem found: empty names,
    /// duplicate wire or attribute names, `write_optional` on a required
    /// field. Recurses into nested entities.
    pub fn check(&self) -> Result<(), String> {
        let mut wires: Vec<&str> = Vec::with_capacity(self.fields.len());
        let mut attrs: Vec<&str> = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.name.is_empty() || field.wire_name().is_empty() {
                return Err("NAME_EMPTY".into());
            }
            if attrs.contains(&field.name.as_str()) {
                return Err("DUP_ATTR".into());
            }
            if wires.contains(&field.wire_name()) {
                return Err("DUP_WIRE".into());
            }
            if field.write_optional && !field.optional {
                return Err("WRITE_OPTIONAL".into());
            }
            attrs.push(&field.name);
            wires.push(field.wire_name());
            check_coder(&field.coder)?;
        }
        Ok(())
    }
}

fn check_coder(coder: &Coder) -> Result<(), String> {
    match coder {
        Coder::Nested(entity) => entity.check(),
        Coder::List(element) => check_coder(element),
        _ => Ok(()),
    }
}

/// A decoded (or hand-built) value conforming to an entity schema.
///
/// Each field slot is a three-state `Presence`: a typed value, `Null` for an
/// explicit JSON `null`, or `Absent` when the key was not present.
#[derive(Debug, Clone)]
pub struct Instance {
    entity: Arc<Entity>,
    values: Vec<Presence<Native>>,
}

impl Instance {
    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    /// The slot for an attribute, by attribute name (not wire name).
    pub fn get(&self, attr: &str) -> Option<&Presence<Native>> {
        self.entity.field_index(attr).map(|i| &self.values[i])
    }

    /// Sets an attribute value, chainable for hand-building instances.
    ///
    /// Panics if the entity declares no such attribute.
    pub fn set(mut self, attr: &str, value: impl Into<Native>) -> Self {
        let i = self.slot_index(attr);
        self.values[i] = Presence::Present(value.into());
        self
    }

    /// Sets an attribute to explicit `null`.
    ///
    /// Panics if the entity declares no such attribute.
    pub fn set_null(mut self, attr: &str) -> Self {
        let i = self.slot_index(attr);
        self.values[i] = Presence::Null;
        self
    }

    fn slot_index(&self, attr: &str) -> usize {
        match self.entity.field_index(attr) {
            Some(i) => i,
            None => panic!("entity `{}` has no attribute `{attr}`", self.entity.name),
        }
    }

    /// Encodes back to a JSON object, keys in field declaration order.
    ///
    /// A missing optional value is omitted entirely (never written as
    /// `null`, unless the field opted in with `write_optional`); a missing
    /// required value is an `InconsistentState` error.
    pub fn to_json(&self) -> Result<Value, ShapeError> {
        let mut out = Map::with_capacity(self.values.len());
        for (field, slot) in self.entity.fields.iter().zip(&self.values) {
            let wire = field.wire_name();
            match slot {
                Presence::Present(native) => {
                    out.insert(wire.to_string(), field.coder.encode(wire, native)?);
                }
                Presence::Null | Presence::Absent => {
                    if !field.optional {
                        return Err(ShapeError::InconsistentState {
                            field: wire.to_string(),
                        });
                    }
                    if field.write_optional {
                        out.insert(wire.to_string(), Value::Null);
                    }
                }
            }
        }
        Ok(Value::Object(out))
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.entity.name == other.entity.name && self.values == other.values
    }
}
