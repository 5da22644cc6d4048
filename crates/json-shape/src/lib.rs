//! Declarative JSON field schemas with symmetric decode/encode.
//!
//! Declare the shape of a JSON object once as an [`Entity`] — an ordered
//! list of named, typed field descriptors — and get both directions for
//! free: [`Entity::from_json`] decodes an object into a strongly typed
//! [`Instance`], [`Instance::to_json`] encodes it back.
//!
//! The engine keeps "key absent", "key present with `null`", and "key
//! present with a value" as three distinct states ([`Presence`]), applies
//! per-field renaming, optionality and default policy consistently in both
//! directions, and composes recursively through nested entities and lists.
//!
//! ```
//! use json_shape::{Entity, F};
//! use serde_json::json;
//!
//! let user = Entity::new(
//!     "User",
//!     vec![
//!         F.str("username"),
//!         F.int("user_id").rename("userId"),
//!         F.datetime("birthday").optional(),
//!     ],
//! );
//!
//! let decoded = user
//!     .from_json(&json!({"username": "abonanno", "userId": 1312}))
//!     .unwrap();
//! assert!(decoded.get("birthday").unwrap().is_absent());
//!
//! // a missing optional field is omitted on encode, not written as null
//! assert_eq!(
//!     decoded.to_json().unwrap(),
//!     json!({"username": "abonanno", "userId": 1312}),
//! );
//! ```

pub mod builder;
pub mod coder;
pub mod entity;
pub mod error;
pub mod field;
pub mod presence;
pub mod value;

pub use builder::{FieldBuilder, F};
pub use coder::Coder;
pub use entity::{Entity, Instance};
pub use error::ShapeError;
pub use field::{Field, Validator};
pub use presence::Presence;
pub use value::{json_kind, Native};
