use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::state::error::StateError;

/// Dense index of an object class within a schema.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

impl ClassId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ClassId {
    fn from(value: usize) -> Self {
        ClassId(value)
    }
}

/// A named class of objects and the integer attributes every instance carries.
///
/// `relations` name references from an instance to another object of the same state, such as
/// the block a block rests on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectClass {
    pub name: String,
    pub attributes: Vec<String>,
    #[serde(default)]
    pub relations: Vec<String>,
}

impl ObjectClass {
    pub fn new<I, T>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        ObjectClass {
            name: name.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
            relations: Vec::new(),
        }
    }

    /// Builder-style setter for the relation names.
    pub fn with_relations<I, T>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.relations = relations.into_iter().map(Into::into).collect();
        self
    }

    pub fn relation_index(&self, relation: &str) -> Option<usize> {
        self.relations.iter().position(|r| r == relation)
    }

    pub fn attribute_index(&self, attribute: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a == attribute)
    }

    pub fn arity(&self) -> usize {
        self.attributes.len()
    }
}

/// The set of object classes states of one domain are built from.
#[derive(Debug, Clone)]
pub struct Schema {
    classes: Vec<ObjectClass>,
    by_name: HashMap<String, ClassId>,
}

impl Schema {
    /// Build a schema; class names must be unique, and so must attribute and relation names
    /// within a class.
    pub fn new(classes: Vec<ObjectClass>) -> Result<Self, StateError> {
        let mut by_name = HashMap::with_capacity(classes.len());

        for (idx, class) in classes.iter().enumerate() {
            if by_name
                .insert(class.name.clone(), ClassId::from(idx))
                .is_some()
            {
                return Err(StateError::DuplicateClass {
                    class: class.name.clone(),
                });
            }

            let mut seen = HashSet::with_capacity(class.attributes.len() + class.relations.len());
            for attribute in class.attributes.iter().chain(&class.relations) {
                if !seen.insert(attribute) {
                    return Err(StateError::DuplicateAttribute {
                        class: class.name.clone(),
                        attribute: attribute.clone(),
                    });
                }
            }
        }

        Ok(Schema { classes, by_name })
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn class(&self, id: ClassId) -> Option<&ObjectClass> {
        self.classes.get(id.index())
    }

    pub fn classes(&self) -> &[ObjectClass] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
