//! Data model types shared by the resolver, guards and route synthesizer.
//!
//! Canonical string forms:
//! - Chain: `collection > category > item` (outer to inner)
//! - Active set: `[category, item]`
//! - Route variant: `formatted edit url`

mod active_set;
mod chain;
mod kind;
mod params;
mod route;

pub use active_set::ActiveSet;
pub use chain::ResourceChain;
pub use kind::ResourceKind;
pub use params::Params;
pub use route::{
    ID_OPTION, RouteArg, RouteExtras, RouteForm, RouteOptions, RoutePlan, RouteVariant, UrlSuffix,
};
