//! Knowledge base vocabulary used to describe components

/// Class every installable component is a member of
pub const CONCEPT_REUSABLE_COMPONENT: &str = "concept_reusable_component";

/// Attribute whose content is the component's artifact location
pub const NREL_COMPONENT_ADDRESS: &str = "nrel_component_address";

/// Relation from a component to its installation method
pub const NREL_INSTALLATION_METHOD: &str = "nrel_installation_method";

/// Relation from a component to the components it depends on
pub const NREL_COMPONENT_DEPENDENCIES: &str = "nrel_component_dependencies";
