use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::hashing::StateHasher;
use crate::planner::config::ConfigError;
use crate::state::object_state::{ObjectId, ObjectState};

/// Whether the mask lists the participating components or the ignored ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskMode {
    /// Only listed classes and objects participate.
    Include,
    /// Listed classes and objects are ignored.
    #[default]
    Exclude,
}

/// Selects which objects take part in state equality, by class name or object name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    pub mode: MaskMode,
    pub classes: Vec<String>,
    pub objects: Vec<String>,
}

impl MaskConfig {
    /// Whether an object of `class` named `object` participates in hashing and equality.
    pub fn participates(&self, class: &str, object: &str) -> bool {
        let listed =
            self.classes.iter().any(|c| c == class) || self.objects.iter().any(|o| o == object);
        match self.mode {
            MaskMode::Include => listed,
            MaskMode::Exclude => !listed,
        }
    }
}

/// Configuration of an `ObjectStateHasher`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    /// Leave object names out of keys so states that only differ by naming collapse.
    pub identifier_independent: bool,
    pub mask: MaskConfig,
}

impl Default for HashingConfig {
    fn default() -> Self {
        HashingConfig {
            identifier_independent: true,
            mask: MaskConfig::default(),
        }
    }
}

impl HashingConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Canonical form of a relation target.
///
/// Links never carry an `ObjectId`, which depends on insertion order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LinkKey {
    /// Target name; used when keys include names.
    Named(String),
    /// Target class and attribute values; used when keys ignore names.
    Record { class: String, values: Vec<i64> },
    /// The target is masked out.
    Masked,
}

/// Canonical record of one participating object.
///
/// Field order is the sort order: class name, then attribute values, then relation targets,
/// then the name when names are part of the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey {
    pub class: String,
    pub values: Vec<i64>,
    pub links: Vec<Option<LinkKey>>,
    pub name: Option<String>,
}

/// Canonical key of an object state.
///
/// Hashing uses a digest computed once; equality compares the full sorted object records.
#[derive(Debug, Clone)]
pub struct ObjectStateKey {
    digest: u64,
    objects: Vec<ObjectKey>,
}

impl ObjectStateKey {
    fn new(mut objects: Vec<ObjectKey>) -> Self {
        objects.sort();
        let mut hasher = DefaultHasher::new();
        objects.hash(&mut hasher);
        ObjectStateKey {
            digest: hasher.finish(),
            objects,
        }
    }

    pub fn digest(&self) -> u64 {
        self.digest
    }

    pub fn objects(&self) -> &[ObjectKey] {
        &self.objects
    }
}

impl PartialEq for ObjectStateKey {
    fn eq(&self, other: &Self) -> bool {
        self.digest == other.digest && self.objects == other.objects
    }
}

impl Eq for ObjectStateKey {}

impl Hash for ObjectStateKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.digest);
    }
}

/// Masked, order-independent hasher for `ObjectState`.
#[derive(Debug, Clone, Default)]
pub struct ObjectStateHasher {
    config: HashingConfig,
}

impl ObjectStateHasher {
    pub fn new(config: HashingConfig) -> Self {
        ObjectStateHasher { config }
    }

    /// Keys ignore object names.
    pub fn identifier_independent() -> Self {
        Self::new(HashingConfig::default())
    }

    /// Keys include object names.
    pub fn identifier_dependent() -> Self {
        Self::new(HashingConfig {
            identifier_independent: false,
            mask: MaskConfig::default(),
        })
    }

    pub fn config(&self) -> &HashingConfig {
        &self.config
    }

    /// Make objects of the given classes participate (`include == true`) or not.
    pub fn set_class_mask<I, T>(&mut self, include: bool, classes: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let listed = self.listed_when(include);
        let mask = &mut self.config.mask;
        for class in classes {
            toggle(&mut mask.classes, class.into(), listed);
        }
    }

    /// Make the named objects participate (`include == true`) or not.
    pub fn set_object_mask<I, T>(&mut self, include: bool, objects: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let listed = self.listed_when(include);
        let mask = &mut self.config.mask;
        for object in objects {
            toggle(&mut mask.objects, object.into(), listed);
        }
    }

    /// In include mode a participating name is listed; in exclude mode it is not.
    fn listed_when(&self, include: bool) -> bool {
        match self.config.mask.mode {
            MaskMode::Include => include,
            MaskMode::Exclude => !include,
        }
    }
}

fn toggle(list: &mut Vec<String>, name: String, listed: bool) {
    let present = list.iter().any(|n| *n == name);
    if listed && !present {
        list.push(name);
    } else if !listed && present {
        list.retain(|n| *n != name);
    }
}

impl StateHasher<ObjectState> for ObjectStateHasher {
    type Key = ObjectStateKey;

    fn hash_state(&self, state: &ObjectState) -> ObjectStateKey {
        let objects = state
            .objects()
            .filter_map(|id| {
                let class = state.class_name(id)?;
                let name = state.name(id)?;
                if !self.config.mask.participates(class, name) {
                    return None;
                }
                let links = state
                    .links(id)?
                    .iter()
                    .map(|target| target.and_then(|target| self.link_key(state, target)))
                    .collect();
                Some(ObjectKey {
                    class: class.to_string(),
                    values: state.values(id)?.to_vec(),
                    links,
                    name: (!self.config.identifier_independent).then(|| name.to_string()),
                })
            })
            .collect();

        ObjectStateKey::new(objects)
    }
}

impl ObjectStateHasher {
    fn link_key(&self, state: &ObjectState, target: ObjectId) -> Option<LinkKey> {
        let class = state.class_name(target)?;
        let name = state.name(target)?;
        if !self.config.mask.participates(class, name) {
            return Some(LinkKey::Masked);
        }
        if self.config.identifier_independent {
            Some(LinkKey::Record {
                class: class.to_string(),
                values: state.values(target)?.to_vec(),
            })
        } else {
            Some(LinkKey::Named(name.to_string()))
        }
    }
}
