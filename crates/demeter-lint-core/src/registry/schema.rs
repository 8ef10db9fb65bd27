//! TOML model schema (DTO layer).
//!
//! A schema lists models with their attributes and associations:
//!
//! ```toml
//! [[models]]
//! name = "Invoice"
//! attributes = ["total", "paid_at"]
//! associations = [
//!     { name = "user", kind = "belongs_to" },
//!     { name = "items", kind = "has_many", class_name = "LineItem" },
//! ]
//! ```
//!
//! When `class_name` is omitted the target class follows the Rails
//! convention: the classified association name (`users` -> `User`).

use super::{AssociationKind, ModelIndex};
use crate::inflect::classify;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Raw TOML representation of a model schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelSchema {
    /// Declared models.
    #[serde(default)]
    pub models: Vec<ModelDef>,
}

/// TOML representation of one model.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDef {
    /// Class name (e.g., "Invoice").
    pub name: String,
    /// Attribute names.
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Declared associations.
    #[serde(default)]
    pub associations: Vec<AssociationDef>,
}

/// TOML representation of one association.
#[derive(Debug, Clone, Deserialize)]
pub struct AssociationDef {
    /// Association name (e.g., "user").
    pub name: String,
    /// Association macro (`belongs_to`, `has_one`, `has_many`, ...).
    pub kind: AssociationKind,
    /// Target class; defaults to the classified association name.
    #[serde(default)]
    pub class_name: Option<String>,
}

impl AssociationDef {
    /// Returns the explicit or conventional target class.
    #[must_use]
    pub fn target_class(&self) -> String {
        self.class_name
            .clone()
            .unwrap_or_else(|| classify(&self.name))
    }
}

/// Errors while loading a model schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// IO error reading the schema file.
    #[error("Failed to read schema file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// TOML syntax or shape error.
    #[error("Failed to parse schema: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A model or association without a name.
    #[error("models[{index}]: {what} name must not be empty")]
    EmptyName {
        /// Position of the offending model.
        index: usize,
        /// What is unnamed ("model" or "association").
        what: &'static str,
    },
}

impl ModelSchema {
    /// Parses a schema from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, SchemaError> {
        toml::from_str(content).map_err(|e| SchemaError::Parse {
            message: e.to_string(),
        })
    }

    /// Loads a schema from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Builds a [`ModelIndex`] from this schema.
    ///
    /// Models declared more than once are merged; a later association with
    /// the same name replaces an earlier one.
    ///
    /// # Errors
    ///
    /// Returns an error if a model or association name is empty.
    pub fn into_index(self) -> Result<ModelIndex, SchemaError> {
        let mut index = ModelIndex::new();

        for (i, model) in self.models.into_iter().enumerate() {
            if model.name.trim().is_empty() {
                return Err(SchemaError::EmptyName {
                    index: i,
                    what: "model",
                });
            }
            index.add_model(&model.name);

            for attribute in &model.attributes {
                index.add_attribute(&model.name, attribute);
            }

            for association in &model.associations {
                if association.name.trim().is_empty() {
                    return Err(SchemaError::EmptyName {
                        index: i,
                        what: "association",
                    });
                }
                index.add_association(
                    &model.name,
                    &association.name,
                    association.kind,
                    &association.target_class(),
                );
            }
        }

        Ok(index)
    }
}

impl ModelIndex {
    /// Parses a TOML schema straight into an index.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is invalid.
    pub fn from_toml(content: &str) -> Result<Self, SchemaError> {
        ModelSchema::parse(content)?.into_index()
    }

    /// Loads a TOML schema file straight into an index.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the schema is invalid.
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        ModelSchema::from_file(path)?.into_index()
    }
}
