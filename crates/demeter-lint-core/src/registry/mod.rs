//! Read-only lookups over declared model associations and attributes.
//!
//! Reviews only see the two traits below. [`ModelIndex`] is the in-memory
//! implementation, usually loaded from a TOML schema (see [`schema`]).

mod index;
pub mod schema;

pub use index::ModelIndex;
pub use schema::{AssociationDef, ModelDef, ModelSchema, SchemaError};

use serde::{Deserialize, Serialize};

/// Kind of a declared association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssociationKind {
    /// `belongs_to`
    BelongsTo,
    /// `has_one`
    HasOne,
    /// `has_many`
    HasMany,
    /// Anything else (`has_and_belongs_to_many`, custom macros).
    Other,
}

impl AssociationKind {
    /// Returns the declaration name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BelongsTo => "belongs_to",
            Self::HasOne => "has_one",
            Self::HasMany => "has_many",
            Self::Other => "other",
        }
    }

    /// Returns true for associations that point at a single record.
    #[must_use]
    pub fn is_singular(self) -> bool {
        matches!(self, Self::BelongsTo | Self::HasOne)
    }
}

impl From<String> for AssociationKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "belongs_to" => Self::BelongsTo,
            "has_one" => Self::HasOne,
            "has_many" => Self::HasMany,
            _ => Self::Other,
        }
    }
}

impl From<AssociationKind> for String {
    fn from(kind: AssociationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared association, keyed elsewhere by (owning class, name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Association macro used.
    pub kind: AssociationKind,
    /// Class the association points at.
    pub class_name: String,
}

impl Association {
    /// Creates an association record.
    #[must_use]
    pub fn new(kind: AssociationKind, class_name: impl Into<String>) -> Self {
        Self {
            kind,
            class_name: class_name.into(),
        }
    }
}

/// Lookup of declared associations.
///
/// Unknown classes and names are answered with `None`/`false`, never an error.
pub trait AssociationRegistry: Send + Sync {
    /// Returns the association `association_name` declared on `class_name`.
    fn get_association(&self, class_name: &str, association_name: &str) -> Option<&Association>;

    /// Returns true if `name` is an association of `class_name`.
    fn is_association(&self, class_name: &str, name: &str) -> bool {
        self.get_association(class_name, name).is_some()
    }

    /// Returns every known class name, in declaration order.
    fn class_names(&self) -> Vec<&str>;
}

/// Lookup of declared attributes.
pub trait AttributeRegistry: Send + Sync {
    /// Returns true if `attribute_name` is an attribute of `class_name`.
    fn is_attribute(&self, class_name: &str, attribute_name: &str) -> bool;
}
