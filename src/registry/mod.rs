//! Read-only view over the knowledge base
//!
//! The store itself is external. [`Registry`] is the query interface kbcm
//! consumes, and [`RegistryAdapter`] turns raw queries into component
//! descriptors and dependency edges. Descriptors are fresh snapshots taken
//! on every lookup; nothing is cached between installations.

pub mod keynodes;
mod yaml;

pub use yaml::YamlRegistry;

/// Opaque handle to an entity in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef(usize);

impl EntityRef {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Query interface of the knowledge store
pub trait Registry: Sync {
    /// Find an entity by its system identifier
    fn find_by_identifier(&self, name: &str) -> Option<EntityRef>;

    /// Check whether `entity` is a member of the class named `class`
    fn has_class_membership(&self, entity: EntityRef, class: &str) -> bool;

    /// Content of the `attribute` link attached to `entity`, if any
    fn get_attribute_content(&self, entity: EntityRef, attribute: &str) -> Option<String>;

    /// Targets of the outgoing `relation` arcs of `entity`, in declaration order
    fn get_outgoing_relation(&self, entity: EntityRef, relation: &str) -> Vec<EntityRef>;

    /// System identifier of `entity`
    fn get_identifier(&self, entity: EntityRef) -> Option<String>;
}

/// Snapshot of a component's attributes at resolution time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub identifier: String,
    /// `None` when the identifier is unknown to the store
    pub entity: Option<EntityRef>,
    pub is_reusable: bool,
    pub artifact_location: Option<String>,
    pub installation_method: Option<EntityRef>,
}

impl ComponentDescriptor {
    /// Whether the identifier resolved to a real entity
    pub fn is_valid(&self) -> bool {
        self.entity.is_some()
    }
}

/// A "`from` depends on `to`" edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
}

/// Builds descriptors and edges from registry queries
#[derive(Clone, Copy)]
pub struct RegistryAdapter<'a> {
    registry: &'a dyn Registry,
}

impl<'a> RegistryAdapter<'a> {
    pub fn new(registry: &'a dyn Registry) -> Self {
        Self { registry }
    }

    /// Describe the component named `identifier`
    pub fn describe(&self, identifier: &str) -> ComponentDescriptor {
        let Some(entity) = self.registry.find_by_identifier(identifier) else {
            return ComponentDescriptor {
                identifier: identifier.to_string(),
                entity: None,
                is_reusable: false,
                artifact_location: None,
                installation_method: None,
            };
        };

        ComponentDescriptor {
            identifier: identifier.to_string(),
            entity: Some(entity),
            is_reusable: self
                .registry
                .has_class_membership(entity, keynodes::CONCEPT_REUSABLE_COMPONENT),
            artifact_location: self
                .registry
                .get_attribute_content(entity, keynodes::NREL_COMPONENT_ADDRESS),
            installation_method: self
                .registry
                .get_outgoing_relation(entity, keynodes::NREL_INSTALLATION_METHOD)
                .first()
                .copied(),
        }
    }

    /// Dependency edges declared by `descriptor`, in declaration order
    pub fn dependencies(&self, descriptor: &ComponentDescriptor) -> Vec<DependencyEdge> {
        let Some(entity) = descriptor.entity else {
            return Vec::new();
        };

        self.registry
            .get_outgoing_relation(entity, keynodes::NREL_COMPONENT_DEPENDENCIES)
            .into_iter()
            .map(|target| DependencyEdge {
                from: descriptor.identifier.clone(),
                // Unnamed targets get a placeholder that never resolves
                to: self
                    .registry
                    .get_identifier(target)
                    .unwrap_or_else(|| format!("#{}", target.index())),
            })
            .collect()
    }

    /// Identifier of an entity, for logging
    pub fn identifier_of(&self, entity: EntityRef) -> Option<String> {
        self.registry.get_identifier(entity)
    }
}
