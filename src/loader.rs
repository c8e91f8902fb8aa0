use std::collections::HashMap;

use serde::Deserialize;

use crate::controller::ResourceController;
use crate::error::ResourceError;
use crate::guards::GuardFilter;
use crate::naming::NamingOverrides;
use crate::types::{ResourceChain, ResourceKind};

/// Serialized form of a controller declaration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Declaration {
    resources: Vec<ResourceKind>,
    #[serde(default)]
    overrides: HashMap<ResourceKind, NamingOverrides>,
    #[serde(default)]
    filters: Vec<GuardFilter>,
}

/// Build a controller from a JSON declaration.
///
/// Malformed JSON, unknown fields and unknown enum values are
/// `ResourceError::InvalidFormat`; the declaration itself is checked as by
/// [`ResourceController::declare`].
///
/// Example:
/// ```rust
/// use nested_resources::compile_declaration;
/// let text = r#"{
///     "resources": ["collection", "category", "item"],
///     "overrides": { "item": { "finder_method": "find_by_param" } },
///     "filters": [ { "kind": "item", "mode": "require" } ]
/// }"#;
/// let controller = compile_declaration(text).unwrap();
/// assert_eq!(controller.primary().as_str(), "item");
/// ```
pub fn compile_declaration(text: &str) -> Result<ResourceController, ResourceError> {
    let declaration: Declaration = serde_json::from_str(text)?;
    ResourceController::build(
        ResourceChain::new(declaration.resources)?,
        &declaration.overrides,
        declaration.filters,
    )
}

impl ResourceController {
    /// See [`compile_declaration`].
    pub fn from_json_str(text: &str) -> Result<Self, ResourceError> {
        compile_declaration(text)
    }
}
