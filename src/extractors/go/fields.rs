//! Field classifier
//!
//! Decides, per field, which bucket it belongs to and which accessors get
//! generated. Exported fields are reachable directly, so they get none.
//! Names that cannot be turned into a valid identifier are set aside with a
//! reason instead of failing the struct.

use crate::error::Result;
use crate::model::{Field, Fields};
use crate::utils::names;
use serde::Serialize;

/// Which accessors to generate for private fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifyPolicy {
    pub getters: bool,
    pub setters: bool,
}

impl Default for ClassifyPolicy {
    fn default() -> Self {
        Self {
            getters: true,
            setters: true,
        }
    }
}

impl ClassifyPolicy {
    pub fn getters_only() -> Self {
        Self {
            getters: true,
            setters: false,
        }
    }

    pub fn setters_only() -> Self {
        Self {
            getters: false,
            setters: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldBucket {
    Public,
    Private,
    Ignored,
}

/// Classify one field name. `type_text` is the declared type, verbatim.
pub fn classify_field(
    name: &str,
    type_text: &str,
    index: usize,
    policy: ClassifyPolicy,
) -> Result<(FieldBucket, Field)> {
    if let Some(reason) = names::ignore_reason(name) {
        return Ok((FieldBucket::Ignored, ignored_field(name, index, reason)));
    }

    let mut field = Field {
        name: name.to_string(),
        type_text: type_text.to_string(),
        index,
        is_public: names::is_public(name),
        ..Default::default()
    };

    if field.is_public {
        return Ok((FieldBucket::Public, field));
    }

    field.getter_name = names::to_getter_name(name)?;
    field.setter_name = names::to_setter_name(name)?;
    field.will_generate_getter = policy.getters;
    field.will_generate_setter = policy.setters;

    Ok((FieldBucket::Private, field))
}

pub(crate) fn ignored_field(name: &str, index: usize, reason: &str) -> Field {
    Field {
        name: name.to_string(),
        index,
        ignore_reason: Some(reason.to_string()),
        ..Default::default()
    }
}

/// The three field tables of one struct.
#[derive(Debug, Default)]
pub struct FieldTables {
    pub public: Fields,
    pub private: Fields,
    pub ignored: Fields,
}

impl FieldTables {
    /// Returns false if a field with this name was already present.
    pub fn insert(&mut self, bucket: FieldBucket, field: Field) -> bool {
        if self.contains(&field.name) {
            return false;
        }
        let table = match bucket {
            FieldBucket::Public => &mut self.public,
            FieldBucket::Private => &mut self.private,
            FieldBucket::Ignored => &mut self.ignored,
        };
        table.insert(field.name.clone(), field);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.public.contains_key(name)
            || self.private.contains_key(name)
            || self.ignored.contains_key(name)
    }
}
