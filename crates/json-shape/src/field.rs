//! Field descriptors.
//!
//! A `Field` declares one named slot on an entity: how the key appears on
//! the wire, whether it may be missing or null, what it defaults to, and
//! which coder converts its value.

use std::sync::Arc;

use crate::coder::Coder;
use crate::value::Native;

/// Validation hook run against each decoded value. Returns a reason string
/// on rejection, surfaced as `ShapeError::ValidationFailed`.
pub type Validator = Arc<dyn Fn(&Native) -> Result<(), String> + Send + Sync>;

/// One declared, named slot on an entity.
#[derive(Clone)]
pub struct Field {
    /// Attribute name: how the value is addressed on the decoded instance.
    pub name: String,
    /// Wire override; when unset the attribute name is used as the JSON key.
    pub rename: Option<String>,
    /// Whether the key may be absent or `null` on decode.
    pub optional: bool,
    /// Whether a missing optional value is still written out as `null`.
    pub write_optional: bool,
    /// Native value used when the key is absent. Not run through the coder.
    pub default: Option<Native>,
    pub validators: Vec<Validator>,
    pub coder: Coder,
}

impl Field {
    pub fn new(name: impl Into<String>, coder: Coder) -> Self {
        Self {
            name: name.into(),
            rename: None,
            optional: false,
            write_optional: false,
            default: None,
            validators: Vec::new(),
            coder,
        }
    }

    /// The JSON object key this field reads from and writes to.
    pub fn wire_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    /// Overrides the JSON key, leaving the attribute name untouched.
    pub fn rename(mut self, wire: impl Into<String>) -> Self {
        self.rename = Some(wire.into());
        self
    }

    /// Allows the key to be absent or explicitly `null`.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Emits `null` instead of omitting the key when an optional value is
    /// missing. Only meaningful together with [`Field::optional`]; the
    /// combination is enforced by `Entity::check`.
    pub fn write_optional(mut self) -> Self {
        self.write_optional = true;
        self
    }

    /// Value used when the key is absent from the input object.
    pub fn default_value(mut self, value: impl Into<Native>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Appends a validation hook, run in declaration order after decode.
    pub fn validator<F>(mut self, f: F) -> Self
    where
        F: Fn(&Native) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(f));
        self
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("rename", &self.rename)
            .field("optional", &self.optional)
            .field("write_optional", &self.write_optional)
            .field("default", &self.default)
            .field("validators", &self.validators.len())
            .field("coder", &self.coder)
            .finish()
    }
}
