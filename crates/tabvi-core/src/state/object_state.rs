use std::sync::Arc;

use crate::state::{
    error::StateError,
    schema::{ClassId, ObjectClass, Schema},
};

/// Dense index of an object within one state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ObjectId {
    fn from(value: usize) -> Self {
        ObjectId(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ObjectRecord {
    name: String,
    class: ClassId,
    row: usize,
    links: Vec<Option<ObjectId>>,
}

/// A state made of named objects with integer attributes.
///
/// Objects are addressed by `ObjectId` in insertion order. Attribute values of all objects of
/// one class are stored row-major in a single vector, one row per object. Relations between
/// objects are stored per object as the `ObjectId` of the target, one slot per class relation.
#[derive(Debug, Clone)]
pub struct ObjectState {
    schema: Arc<Schema>,
    objects: Vec<ObjectRecord>,
    columns: Vec<Vec<i64>>,
}

impl ObjectState {
    /// Create an empty state over `schema`.
    pub fn new(schema: Arc<Schema>) -> Self {
        let columns = vec![Vec::new(); schema.len()];
        ObjectState {
            schema,
            objects: Vec::new(),
            columns,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Add an object of class `class` with one value per class attribute.
    pub fn add_object(
        &mut self,
        class: &str,
        name: impl Into<String>,
        values: &[i64],
    ) -> Result<ObjectId, StateError> {
        let name = name.into();
        let class_id = self
            .schema
            .class_id(class)
            .ok_or_else(|| StateError::UnknownClass {
                class: class.to_string(),
            })?;
        let class_def = self.class_def(class_id);
        let arity = class_def.arity();
        let links = vec![None; class_def.relations.len()];

        if values.len() != arity {
            return Err(StateError::ArityMismatch {
                class: class.to_string(),
                expected: arity,
                got: values.len(),
            });
        }
        if self.object_by_name(&name).is_some() {
            return Err(StateError::DuplicateObject { name });
        }

        let column = &mut self.columns[class_id.index()];
        let row = if arity == 0 {
            self.objects.iter().filter(|o| o.class == class_id).count()
        } else {
            column.len() / arity
        };
        column.extend_from_slice(values);

        let id = ObjectId::from(self.objects.len());
        self.objects.push(ObjectRecord {
            name,
            class: class_id,
            row,
            links,
        });
        Ok(id)
    }

    /// Builder-style `add_object`.
    pub fn with_object(
        mut self,
        class: &str,
        name: impl Into<String>,
        values: &[i64],
    ) -> Result<Self, StateError> {
        self.add_object(class, name, values)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All object ids in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = ObjectId> {
        (0..self.objects.len()).map(ObjectId::from)
    }

    pub fn object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|o| o.name == name)
            .map(ObjectId::from)
    }

    /// Ids of every object of class `class`, in insertion order.
    pub fn objects_of_class(&self, class: &str) -> Vec<ObjectId> {
        let Some(class_id) = self.schema.class_id(class) else {
            return Vec::new();
        };
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.class == class_id)
            .map(|(i, _)| ObjectId::from(i))
            .collect()
    }

    pub fn name(&self, id: ObjectId) -> Option<&str> {
        self.objects.get(id.index()).map(|o| o.name.as_str())
    }

    pub fn class_id(&self, id: ObjectId) -> Option<ClassId> {
        self.objects.get(id.index()).map(|o| o.class)
    }

    pub fn class_name(&self, id: ObjectId) -> Option<&str> {
        self.class_id(id)
            .map(|class| self.class_def(class).name.as_str())
    }

    /// Attribute values of an object in class attribute order.
    pub fn values(&self, id: ObjectId) -> Option<&[i64]> {
        let record = self.objects.get(id.index())?;
        let arity = self.class_def(record.class).arity();
        let start = record.row * arity;
        self.columns[record.class.index()].get(start..start + arity)
    }

    /// Read one attribute of an object.
    pub fn get(&self, id: ObjectId, attribute: &str) -> Result<i64, StateError> {
        let (column, offset) = self.locate(id, attribute)?;
        Ok(self.columns[column][offset])
    }

    /// Read one attribute of the object called `object`.
    pub fn get_named(&self, object: &str, attribute: &str) -> Result<i64, StateError> {
        let id = self.require(object)?;
        self.get(id, attribute)
    }

    /// Overwrite one attribute of an object.
    pub fn set(&mut self, id: ObjectId, attribute: &str, value: i64) -> Result<(), StateError> {
        let (column, offset) = self.locate(id, attribute)?;
        self.columns[column][offset] = value;
        Ok(())
    }

    /// Copy of this state with one attribute of `object` changed.
    pub fn with_value(
        &self,
        object: &str,
        attribute: &str,
        value: i64,
    ) -> Result<Self, StateError> {
        let id = self.require(object)?;
        let mut next = self.clone();
        next.set(id, attribute, value)?;
        Ok(next)
    }

    /// Link targets of an object in class relation order; `None` is an unset link.
    pub fn links(&self, id: ObjectId) -> Option<&[Option<ObjectId>]> {
        self.objects.get(id.index()).map(|o| o.links.as_slice())
    }

    /// The object `relation` of `id` points at.
    pub fn related(&self, id: ObjectId, relation: &str) -> Result<Option<ObjectId>, StateError> {
        let slot = self.locate_relation(id, relation)?;
        Ok(self.objects[id.index()].links[slot])
    }

    /// Name of the object `relation` of the object called `object` points at.
    pub fn related_named(&self, object: &str, relation: &str) -> Result<Option<&str>, StateError> {
        let id = self.require(object)?;
        Ok(self
            .related(id, relation)?
            .and_then(|target| self.name(target)))
    }

    /// Point `relation` of `id` at `target`, or clear it with `None`.
    pub fn relate(
        &mut self,
        id: ObjectId,
        relation: &str,
        target: Option<ObjectId>,
    ) -> Result<(), StateError> {
        let slot = self.locate_relation(id, relation)?;
        if let Some(target) = target.filter(|t| t.index() >= self.objects.len()) {
            return Err(StateError::UnknownObject {
                object: format!("#{}", target.index()),
            });
        }
        self.objects[id.index()].links[slot] = target;
        Ok(())
    }

    /// Copy of this state with `relation` of `object` pointing at the object called `target`.
    pub fn with_relation(
        &self,
        object: &str,
        relation: &str,
        target: Option<&str>,
    ) -> Result<Self, StateError> {
        let id = self.require(object)?;
        let target = target.map(|name| self.require(name)).transpose()?;
        let mut next = self.clone();
        next.relate(id, relation, target)?;
        Ok(next)
    }

    fn require(&self, object: &str) -> Result<ObjectId, StateError> {
        self.object_by_name(object)
            .ok_or_else(|| StateError::UnknownObject {
                object: object.to_string(),
            })
    }

    fn class_def(&self, class: ClassId) -> &ObjectClass {
        &self.schema.classes()[class.index()]
    }

    /// Column and offset of one attribute value.
    fn locate(&self, id: ObjectId, attribute: &str) -> Result<(usize, usize), StateError> {
        let record = self
            .objects
            .get(id.index())
            .ok_or_else(|| StateError::UnknownObject {
                object: format!("#{}", id.index()),
            })?;
        let class = self.class_def(record.class);
        let attr =
            class
                .attribute_index(attribute)
                .ok_or_else(|| StateError::UnknownAttribute {
                    class: class.name.clone(),
                    attribute: attribute.to_string(),
                })?;
        Ok((record.class.index(), record.row * class.arity() + attr))
    }

    /// Slot of one relation in an object's link list.
    fn locate_relation(&self, id: ObjectId, relation: &str) -> Result<usize, StateError> {
        let record = self
            .objects
            .get(id.index())
            .ok_or_else(|| StateError::UnknownObject {
                object: format!("#{}", id.index()),
            })?;
        let class = self.class_def(record.class);
        class
            .relation_index(relation)
            .ok_or_else(|| StateError::UnknownRelation {
                class: class.name.clone(),
                relation: relation.to_string(),
            })
    }
}
