//! Arena-backed model index.

use super::{Association, AssociationKind, AssociationRegistry, AttributeRegistry};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
struct Model {
    name: String,
    associations: HashMap<String, Association>,
    attributes: HashSet<String>,
}

/// In-memory model registry.
///
/// Models are stored in declaration order with a by-name index, so
/// [`AssociationRegistry::class_names`] is deterministic.
///
/// # Example
///
/// ```ignore
/// let mut index = ModelIndex::new();
/// index.add_association("Invoice", "user", AssociationKind::BelongsTo, "User");
/// index.add_attribute("User", "name");
/// assert!(index.is_attribute("User", "name"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelIndex {
    models: Vec<Model>,
    by_name: HashMap<String, usize>,
}

impl ModelIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of known models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true if no model is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Registers a model, returning its slot. Registering twice is a no-op.
    pub fn add_model(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.by_name.get(name) {
            return idx;
        }
        let idx = self.models.len();
        self.models.push(Model {
            name: name.to_string(),
            ..Model::default()
        });
        self.by_name.insert(name.to_string(), idx);
        idx
    }

    /// Declares an association on `class_name`, replacing one with the same name.
    pub fn add_association(
        &mut self,
        class_name: &str,
        association_name: &str,
        kind: AssociationKind,
        target_class: &str,
    ) {
        let idx = self.add_model(class_name);
        self.models[idx].associations.insert(
            association_name.to_string(),
            Association::new(kind, target_class),
        );
    }

    /// Declares an attribute on `class_name`.
    pub fn add_attribute(&mut self, class_name: &str, attribute_name: &str) {
        let idx = self.add_model(class_name);
        self.models[idx]
            .attributes
            .insert(attribute_name.to_string());
    }

    fn model(&self, name: &str) -> Option<&Model> {
        self.by_name.get(name).map(|&idx| &self.models[idx])
    }
}

impl AssociationRegistry for ModelIndex {
    fn get_association(&self, class_name: &str, association_name: &str) -> Option<&Association> {
        self.model(class_name)?.associations.get(association_name)
    }

    fn class_names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }
}

impl AttributeRegistry for ModelIndex {
    fn is_attribute(&self, class_name: &str, attribute_name: &str) -> bool {
        self.model(class_name)
            .is_some_and(|m| m.attributes.contains(attribute_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModelIndex {
        let mut index = ModelIndex::new();
        index.add_association("Invoice", "user", AssociationKind::BelongsTo, "User");
        index.add_association("Invoice", "items", AssociationKind::HasMany, "LineItem");
        index.add_attribute("User", "name");
        index
    }

    #[test]
    fn looks_up_associations() {
        let index = sample();
        let association = index
            .get_association("Invoice", "user")
            .expect("association should exist");
        assert_eq!(association.kind, AssociationKind::BelongsTo);
        assert_eq!(association.class_name, "User");
        assert!(index.is_association("Invoice", "items"));
    }

    #[test]
    fn unknown_names_are_not_found() {
        let index = sample();
        assert!(index.get_association("Invoice", "customer").is_none());
        assert!(index.get_association("Ghost", "user").is_none());
        assert!(!index.is_attribute("User", "email"));
        assert!(!index.is_attribute("Ghost", "name"));
    }

    #[test]
    fn class_names_keep_declaration_order() {
        let index = sample();
        assert_eq!(index.class_names(), vec!["Invoice", "User"]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn redeclared_association_replaces_previous() {
        let mut index = sample();
        index.add_association("Invoice", "user", AssociationKind::HasOne, "Admin");
        let association = index.get_association("Invoice", "user").expect("exists");
        assert_eq!(association.kind, AssociationKind::HasOne);
        assert_eq!(association.class_name, "Admin");
        assert_eq!(index.len(), 2);
    }
}
