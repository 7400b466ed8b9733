use serde::{Deserialize, Serialize};

use crate::planner::affordance::Precondition;
use crate::state::object_state::ObjectState;

/// Propositional test over an object state.
///
/// References to objects, classes or attributes that do not exist make a leaf predicate false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectPredicate {
    Always,
    /// The named object has `attribute == value`.
    AttributeEquals {
        object: String,
        attribute: String,
        value: i64,
    },
    /// Some object of `class` has `attribute == value`.
    AnyOfClass {
        class: String,
        attribute: String,
        value: i64,
    },
    /// At least `at_least` objects of `class` have `attribute == value`.
    CountOfClass {
        class: String,
        attribute: String,
        value: i64,
        at_least: usize,
    },
    /// `relation` of the named object points at `target`; a missing `target` means unset.
    Related {
        object: String,
        relation: String,
        #[serde(default)]
        target: Option<String>,
    },
    Not {
        predicate: Box<ObjectPredicate>,
    },
    All {
        predicates: Vec<ObjectPredicate>,
    },
    Any {
        predicates: Vec<ObjectPredicate>,
    },
}

impl ObjectPredicate {
    pub fn attribute_equals(
        object: impl Into<String>,
        attribute: impl Into<String>,
        value: i64,
    ) -> Self {
        ObjectPredicate::AttributeEquals {
            object: object.into(),
            attribute: attribute.into(),
            value,
        }
    }

    pub fn any_of_class(
        class: impl Into<String>,
        attribute: impl Into<String>,
        value: i64,
    ) -> Self {
        ObjectPredicate::AnyOfClass {
            class: class.into(),
            attribute: attribute.into(),
            value,
        }
    }

    pub fn related(
        object: impl Into<String>,
        relation: impl Into<String>,
        target: Option<&str>,
    ) -> Self {
        ObjectPredicate::Related {
            object: object.into(),
            relation: relation.into(),
            target: target.map(str::to_string),
        }
    }

    pub fn negate(self) -> Self {
        ObjectPredicate::Not {
            predicate: Box::new(self),
        }
    }

    pub fn holds(&self, state: &ObjectState) -> bool {
        match self {
            ObjectPredicate::Always => true,
            ObjectPredicate::AttributeEquals {
                object,
                attribute,
                value,
            } => state
                .get_named(object, attribute)
                .is_ok_and(|v| v == *value),
            ObjectPredicate::AnyOfClass {
                class,
                attribute,
                value,
            } => matching_count(state, class, attribute, *value) > 0,
            ObjectPredicate::CountOfClass {
                class,
                attribute,
                value,
                at_least,
            } => matching_count(state, class, attribute, *value) >= *at_least,
            ObjectPredicate::Related {
                object,
                relation,
                target,
            } => state
                .related_named(object, relation)
                .is_ok_and(|t| t == target.as_deref()),
            ObjectPredicate::Not { predicate } => !predicate.holds(state),
            ObjectPredicate::All { predicates } => predicates.iter().all(|p| p.holds(state)),
            ObjectPredicate::Any { predicates } => predicates.iter().any(|p| p.holds(state)),
        }
    }
}

fn matching_count(state: &ObjectState, class: &str, attribute: &str, value: i64) -> usize {
    state
        .objects_of_class(class)
        .into_iter()
        .filter(|id| state.get(*id, attribute).is_ok_and(|v| v == value))
        .count()
}

impl Precondition<ObjectState> for ObjectPredicate {
    fn holds(&self, state: &ObjectState) -> bool {
        ObjectPredicate::holds(self, state)
    }
}
