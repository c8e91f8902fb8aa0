//! Nested-resource resolution for request controllers.
//!
//! A controller declares the chain of resources it works with, outer to
//! inner, e.g. `collection > category > item`. For each request the crate
//! works out which of them are present in the parameters, loads each one
//! through its active parent (memoized for the request), runs guard filters
//! that stop the request when a required resource is missing, and builds
//! nested route names and arguments such as
//! `collection_category_item_path(collection, category, item)`.
//!
//! The backing store, the route table and the not-found response are
//! supplied by the host through [`BackingStore`], [`RouteTable`] and
//! [`NotFoundHandler`].

pub use controller::{Accessor, ResourceController, ResourceControllerBuilder, RouteHelper};
pub use error::ResourceError;
pub use guards::{FilterStage, GuardFilter, GuardMode, GuardOutcome};
pub use loader::compile_declaration;
pub use naming::{NamingOverrides, NamingPolicy, ResourceNaming};
pub use request::{AccessorValue, ResourceRequest};
pub use resolver::Collection;
pub use routes::dispatch;
pub use traits::{BackingStore, NotFoundHandler, RouteTable};
pub use types::*;

pub use cache::RequestCache;

mod cache;
mod controller;
mod error;
mod guards;
pub mod inflector;
mod loader;
pub mod metrics;
mod naming;
mod request;
mod resolver;
mod routes;
mod timers;
mod traits;
mod types;

#[cfg(test)]
mod tests;
