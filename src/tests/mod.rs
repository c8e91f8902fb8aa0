//! Scenario tests running full requests against in-memory collaborators.

use std::collections::HashMap;

use crate::{NamingOverrides, Params, ResourceController};

mod support;

/// `collection > category > item` with conventional naming.
fn nested_controller() -> ResourceController {
    ResourceController::declare(["collection", "category", "item"], HashMap::new()).unwrap()
}

/// Same chain, with items narrowed by two named scopes.
fn scoped_controller() -> ResourceController {
    ResourceController::builder(["collection", "category", "item"])
        .naming(
            "item",
            NamingOverrides::new().scope_names(["visible", "activated"]),
        )
        .build()
        .unwrap()
}

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs.iter().copied().collect()
}
