//! Field builder.
//!
//! Shorthand constructors for field descriptors, one per coder kind, so a
//! schema declaration reads as a flat list:
//!
//! ```
//! use json_shape::{Entity, F};
//!
//! let user = Entity::new(
//!     "User",
//!     vec![
//!         F.str("username"),
//!         F.int("user_id").rename("userId"),
//!         F.datetime("birthday").optional(),
//!     ],
//! );
//! ```

use std::sync::Arc;

use crate::coder::Coder;
use crate::entity::Entity;
use crate::field::Field;

/// Builder for field descriptors.
#[derive(Debug, Clone, Default)]
pub struct FieldBuilder;

impl FieldBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn str(&self, name: impl Into<String>) -> Field {
        Field::new(name, Coder::Str)
    }

    pub fn int(&self, name: impl Into<String>) -> Field {
        Field::new(name, Coder::Int)
    }

    pub fn float(&self, name: impl Into<String>) -> Field {
        Field::new(name, Coder::Float)
    }

    pub fn bool(&self, name: impl Into<String>) -> Field {
        Field::new(name, Coder::Bool)
    }

    /// ISO-8601 calendar date, `YYYY-MM-DD`.
    pub fn date(&self, name: impl Into<String>) -> Field {
        Field::new(name, Coder::Date)
    }

    /// ISO-8601 timestamp, offset-aware.
    pub fn datetime(&self, name: impl Into<String>) -> Field {
        Field::new(name, Coder::DateTime)
    }

    pub fn uuid(&self, name: impl Into<String>) -> Field {
        Field::new(name, Coder::Uuid)
    }

    /// Untyped pass-through of any JSON value.
    pub fn any(&self, name: impl Into<String>) -> Field {
        Field::new(name, Coder::Any)
    }

    /// Raw JSON object kept as an ordered map.
    pub fn dict(&self, name: impl Into<String>) -> Field {
        Field::new(name, Coder::Dict)
    }

    /// A nested entity.
    pub fn nested(&self, name: impl Into<String>, entity: &Arc<Entity>) -> Field {
        Field::new(name, Coder::Nested(Arc::clone(entity)))
    }

    /// A homogeneous array of the given element coder.
    pub fn list(&self, name: impl Into<String>, element: Coder) -> Field {
        Field::new(name, Coder::List(Box::new(element)))
    }

    /// A homogeneous array of nested entities.
    pub fn list_of(&self, name: impl Into<String>, entity: &Arc<Entity>) -> Field {
        self.list(name, Coder::Nested(Arc::clone(entity)))
    }
}

/// Global default field builder.
pub static F: FieldBuilder = FieldBuilder;
