//! Rule to flag calls that reach through an association for an attribute.
//!
//! # Rationale
//!
//! `@invoice.user.name` makes the caller know that an invoice has a user and
//! that a user has a name. Delegating through the receiver
//! (`delegate :name, to: :user, prefix: true` and `@invoice.user_name`)
//! keeps that knowledge inside `Invoice`.
//!
//! # Detection
//!
//! A call `receiver.association.attribute` is flagged when
//!
//! - `receiver` is a local or instance variable,
//! - the classified receiver name declares `association` as `belongs_to`
//!   or `has_one`, and
//! - `attribute` is a declared attribute (see [`LawOfDemeter::needs_delegate`]
//!   for the polymorphic `*able` case).
//!
//! Only the two-level window directly under each call is inspected; longer
//! chains are caught when the traversal reaches their inner calls.

use demeter_lint_core::inflect::classify;
use demeter_lint_core::{
    Association, AssociationRegistry, AttributeRegistry, Call, FileContext, Findings, ModelIndex,
    NodeKind, Rule, Severity,
};
use std::sync::Arc;

/// Rule code for law-of-demeter.
pub const CODE: &str = "DL001";

/// Rule name for law-of-demeter.
pub const NAME: &str = "law-of-demeter";

/// Message reported for each finding.
pub const MESSAGE: &str = "law of demeter";

/// Best-practice write-up.
pub const URL: &str = "http://rails-bestpractices.com/posts/15-the-law-of-demeter";

/// Suffix marking polymorphic association names (`commentable`).
const ABLE_SUFFIX: &str = "able";

/// Flags `receiver.association.attribute` chains over singular associations.
#[derive(Clone)]
pub struct LawOfDemeter {
    associations: Arc<dyn AssociationRegistry>,
    attributes: Arc<dyn AttributeRegistry>,
    severity: Severity,
}

impl LawOfDemeter {
    /// Creates the rule over the given registries.
    #[must_use]
    pub fn new(
        associations: Arc<dyn AssociationRegistry>,
        attributes: Arc<dyn AttributeRegistry>,
    ) -> Self {
        Self {
            associations,
            attributes,
            severity: Severity::Error,
        }
    }

    /// Creates the rule over a single index serving both lookups.
    #[must_use]
    pub fn from_index(models: Arc<ModelIndex>) -> Self {
        Self::new(models.clone(), models)
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Returns true if `node` is an attribute read through a singular
    /// association of a variable, and should be delegated instead.
    ///
    /// For `*able` names the association target is polymorphic, so any model
    /// declaring the stripped name (`name`) or its naive plural (`names`)
    /// counts as a match. The attribute is then looked up on the receiver's
    /// own class, not on the matched model or the association target.
    ///
    /// Unknown classes, associations, and attributes all answer `false`.
    #[must_use]
    pub fn needs_delegate(&self, node: &Call) -> bool {
        let Some(inner) = node.subject_call() else {
            return false;
        };
        let Some(receiver) = inner.subject_reference() else {
            return false;
        };
        if !receiver.is_variable() {
            return false;
        }

        let class_name = classify(&receiver.name);
        let association_name = inner.message.as_str();
        let attribute_name = node.message.as_str();

        let Some(association) = self
            .associations
            .get_association(&class_name, association_name)
        else {
            return false;
        };

        association.kind.is_singular()
            && self.is_association_attribute(
                &class_name,
                association,
                association_name,
                attribute_name,
            )
    }

    /// Decides whether `attribute_name` is reachable through the association.
    fn is_association_attribute(
        &self,
        origin_class: &str,
        association: &Association,
        association_name: &str,
        attribute_name: &str,
    ) -> bool {
        match able_candidates(association_name) {
            Some([root, plural]) => self.associations.class_names().into_iter().any(|class| {
                (self.associations.is_association(class, &root)
                    || self.associations.is_association(class, &plural))
                    && self.attributes.is_attribute(origin_class, attribute_name)
            }),
            None => self
                .attributes
                .is_attribute(&association.class_name, attribute_name),
        }
    }
}

/// Returns the stripped root and its naive plural for an `*able` name.
///
/// `nameable` yields `["name", "names"]`; names without the suffix yield `None`.
#[must_use]
pub fn able_candidates(association_name: &str) -> Option<[String; 2]> {
    association_name
        .strip_suffix(ABLE_SUFFIX)
        .map(|root| [root.to_string(), format!("{root}s")])
}

impl Rule for LawOfDemeter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags attribute reads through belongs_to/has_one associations"
    }

    fn url(&self) -> Option<&'static str> {
        Some(URL)
    }

    fn suggestion(&self) -> Option<&'static str> {
        Some(
            "Delegate the attribute on the receiver's class, \
             e.g. `delegate :name, to: :user, prefix: true`",
        )
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interesting_nodes(&self) -> &'static [NodeKind] {
        &[NodeKind::Call]
    }

    fn on_call(&self, _ctx: &FileContext<'_>, node: &Call, findings: &mut Findings<'_>) {
        if self.needs_delegate(node) {
            findings.add_error(node.span, MESSAGE);
        }
    }
}
