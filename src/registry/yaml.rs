//! Knowledge base snapshot loaded from a YAML file
//!
//! ```yaml
//! entities:
//!   - id: LibY
//!     classes: [concept_reusable_component]
//!     attributes:
//!       nrel_component_address: https://github.com/org/liby
//!     relations:
//!       nrel_installation_method: [concept_component_dependencies_installation_method]
//!       nrel_component_dependencies: []
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use super::{EntityRef, Registry};
use crate::error::{KbcmError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Snapshot {
    #[serde(default)]
    entities: Vec<EntityRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntityRecord {
    id: String,
    #[serde(default)]
    classes: Vec<String>,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    #[serde(default)]
    relations: BTreeMap<String, Vec<String>>,
}

#[derive(Debug)]
struct Entity {
    id: String,
    classes: HashSet<String>,
    attributes: HashMap<String, String>,
    relations: HashMap<String, Vec<EntityRef>>,
}

impl Entity {
    fn bare(id: String) -> Self {
        Self {
            id,
            classes: HashSet::new(),
            attributes: HashMap::new(),
            relations: HashMap::new(),
        }
    }
}

/// In-memory registry built from a snapshot file
#[derive(Debug, Default)]
pub struct YamlRegistry {
    entities: Vec<Entity>,
    index: HashMap<String, EntityRef>,
}

impl YamlRegistry {
    /// Load a snapshot from disk
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KbcmError::RegistryLoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            KbcmError::RegistryLoadFailed { reason, .. } => KbcmError::RegistryLoadFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse a snapshot from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let snapshot: Snapshot =
            serde_yaml::from_str(yaml).map_err(|e| KbcmError::RegistryLoadFailed {
                path: "<inline>".to_string(),
                reason: e.to_string(),
            })?;

        let mut registry = Self::default();
        let mut pending = Vec::with_capacity(snapshot.entities.len());

        for record in snapshot.entities {
            if registry.index.contains_key(&record.id) {
                return Err(KbcmError::RegistryLoadFailed {
                    path: "<inline>".to_string(),
                    reason: format!("entity '{}' is declared more than once", record.id),
                });
            }
            let entity = registry.intern(&record.id);
            let slot = &mut registry.entities[entity.index()];
            slot.classes = record.classes.into_iter().collect();
            slot.attributes = record.attributes.into_iter().collect();
            pending.push((entity, record.relations));
        }

        for (entity, relations) in pending {
            let mut resolved = HashMap::with_capacity(relations.len());
            for (kind, targets) in relations {
                let targets: Vec<EntityRef> = targets.iter().map(|t| registry.intern(t)).collect();
                resolved.insert(kind, targets);
            }
            registry.entities[entity.index()].relations = resolved;
        }

        Ok(registry)
    }

    /// Number of entities, including bare relation targets
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    fn intern(&mut self, id: &str) -> EntityRef {
        if let Some(entity) = self.index.get(id) {
            return *entity;
        }
        let entity = EntityRef::new(self.entities.len());
        self.entities.push(Entity::bare(id.to_string()));
        self.index.insert(id.to_string(), entity);
        entity
    }

    fn entity(&self, entity: EntityRef) -> Option<&Entity> {
        self.entities.get(entity.index())
    }
}

impl Registry for YamlRegistry {
    fn find_by_identifier(&self, name: &str) -> Option<EntityRef> {
        self.index.get(name).copied()
    }

    fn has_class_membership(&self, entity: EntityRef, class: &str) -> bool {
        self.entity(entity)
            .is_some_and(|e| e.classes.contains(class))
    }

    fn get_attribute_content(&self, entity: EntityRef, attribute: &str) -> Option<String> {
        self.entity(entity)
            .and_then(|e| e.attributes.get(attribute).cloned())
    }

    fn get_outgoing_relation(&self, entity: EntityRef, relation: &str) -> Vec<EntityRef> {
        self.entity(entity)
            .and_then(|e| e.relations.get(relation).cloned())
            .unwrap_or_default()
    }

    fn get_identifier(&self, entity: EntityRef) -> Option<String> {
        self.entity(entity).map(|e| e.id.clone())
    }
}
