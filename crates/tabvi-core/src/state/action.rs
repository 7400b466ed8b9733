use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::object_state::ObjectState;

/// A grounded action in an object-oriented domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectAction {
    Simple {
        name: String,
    },
    /// Bound to named objects, in parameter order.
    Parameterized {
        name: String,
        params: Vec<String>,
    },
}

impl ObjectAction {
    pub fn simple(name: impl Into<String>) -> Self {
        ObjectAction::Simple { name: name.into() }
    }

    pub fn parameterized<I, T>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        ObjectAction::Parameterized {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ObjectAction::Simple { name } | ObjectAction::Parameterized { name, .. } => name,
        }
    }

    pub fn params(&self) -> &[String] {
        match self {
            ObjectAction::Simple { .. } => &[],
            ObjectAction::Parameterized { params, .. } => params.as_slice(),
        }
    }
}

impl fmt::Display for ObjectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectAction::Simple { name } => write!(f, "{name}"),
            ObjectAction::Parameterized { name, params } => {
                write!(f, "{name}({})", params.join(", "))
            }
        }
    }
}

/// An action type whose parameters range over objects of given classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSchema {
    pub name: String,
    /// Class of each parameter; empty for a parameterless action.
    #[serde(default)]
    pub parameter_classes: Vec<String>,
}

impl ActionSchema {
    pub fn simple(name: impl Into<String>) -> Self {
        ActionSchema {
            name: name.into(),
            parameter_classes: Vec::new(),
        }
    }

    pub fn parameterized<I, T>(name: impl Into<String>, parameter_classes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        ActionSchema {
            name: name.into(),
            parameter_classes: parameter_classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Every grounding of this schema in `state`.
    ///
    /// Parameters bind to distinct objects; groundings are ordered by object insertion order,
    /// first parameter slowest.
    pub fn ground(&self, state: &ObjectState) -> Vec<ObjectAction> {
        if self.parameter_classes.is_empty() {
            return vec![ObjectAction::simple(self.name.clone())];
        }

        let candidates: Vec<Vec<String>> = self
            .parameter_classes
            .iter()
            .map(|class| {
                state
                    .objects_of_class(class)
                    .into_iter()
                    .filter_map(|id| state.name(id).map(str::to_string))
                    .collect()
            })
            .collect();

        let mut groundings: Vec<Vec<String>> = vec![Vec::new()];
        for options in &candidates {
            let mut extended = Vec::with_capacity(groundings.len() * options.len());
            for partial in &groundings {
                for option in options {
                    if partial.contains(option) {
                        continue;
                    }
                    let mut next = partial.clone();
                    next.push(option.clone());
                    extended.push(next);
                }
            }
            groundings = extended;
        }

        groundings
            .into_iter()
            .map(|params| ObjectAction::Parameterized {
                name: self.name.clone(),
                params,
            })
            .collect()
    }
}

/// Ordered list of action schemas; grounds the full action set of a state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCatalog {
    pub schemas: Vec<ActionSchema>,
}

impl ActionCatalog {
    pub fn new(schemas: Vec<ActionSchema>) -> Self {
        ActionCatalog { schemas }
    }

    pub fn ground(&self, state: &ObjectState) -> Vec<ObjectAction> {
        self.schemas
            .iter()
            .flat_map(|schema| schema.ground(state))
            .collect()
    }
}
