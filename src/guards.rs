//! Guard filters: preconditions that stop a request when a required
//! resource cannot be found.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::error::ResourceError;
use crate::metrics;
use crate::request::ResourceRequest;
use crate::traits::{BackingStore, NotFoundHandler};
use crate::types::ResourceKind;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GuardMode {
    /// The resource must be found.
    Require,
    /// The resource must be found if its parameter was given.
    SometimesRequire,
}

/// When a filter runs relative to the other pre-action hooks.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterStage {
    PrependBeforeAction,
    #[default]
    BeforeAction,
    AppendBeforeAction,
}

/// A registered precondition on one resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GuardFilter {
    kind: ResourceKind,
    mode: GuardMode,
    #[serde(default)]
    stage: FilterStage,
}

impl GuardFilter {
    pub fn require(kind: impl Into<ResourceKind>) -> Self {
        Self {
            kind: kind.into(),
            mode: GuardMode::Require,
            stage: FilterStage::default(),
        }
    }

    pub fn sometimes_require(kind: impl Into<ResourceKind>) -> Self {
        Self {
            kind: kind.into(),
            mode: GuardMode::SometimesRequire,
            stage: FilterStage::default(),
        }
    }

    pub fn at_stage(mut self, stage: FilterStage) -> Self {
        self.stage = stage;
        self
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    pub fn mode(&self) -> GuardMode {
        self.mode
    }

    pub fn stage(&self) -> FilterStage {
        self.stage
    }
}

/// Result of running a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<R> {
    Continue,
    /// Stop processing the request and answer with this response.
    Halt(R),
}

impl<R> GuardOutcome<R> {
    pub fn is_continue(&self) -> bool {
        matches!(self, GuardOutcome::Continue)
    }

    pub fn is_halt(&self) -> bool {
        !self.is_continue()
    }
}

impl<'c, S: BackingStore> ResourceRequest<'c, S> {
    /// Halt with the not-found response unless `kind` resolves to an object.
    ///
    /// A store failure is logged and treated as a miss.
    pub fn require_resource<H: NotFoundHandler>(
        &mut self,
        kind: &str,
        handler: &H,
    ) -> Result<GuardOutcome<H::Response>, ResourceError> {
        self.check(kind, GuardMode::Require, handler)
    }

    fn check<H: NotFoundHandler>(
        &mut self,
        kind: &str,
        mode: GuardMode,
        handler: &H,
    ) -> Result<GuardOutcome<H::Response>, ResourceError> {
        let controller = self.controller;
        let declared = controller
            .chain()
            .get(kind)
            .ok_or_else(|| ResourceError::UnknownKind(kind.to_string()))?;

        let found = match self.object(kind) {
            Ok(object) => object.is_some(),
            Err(err) if err.is_request_state() => return Err(err),
            Err(err) => {
                warn!(
                    event = "Guard",
                    phase = "Lookup",
                    kind = kind,
                    error = err.to_string()
                );
                false
            }
        };

        metrics::record_guard(kind, mode, found);
        if found {
            Ok(GuardOutcome::Continue)
        } else {
            warn!(event = "Guard", phase = "Halt", kind = kind, "resource not found");
            Ok(GuardOutcome::Halt(handler.not_found(declared)))
        }
    }

    /// Like [`require_resource`](Self::require_resource), but passes when
    /// `kind` is not active for this request.
    pub fn sometimes_require_resource<H: NotFoundHandler>(
        &mut self,
        kind: &str,
        handler: &H,
    ) -> Result<GuardOutcome<H::Response>, ResourceError> {
        if !self.controller.chain().contains(kind) {
            return Err(ResourceError::UnknownKind(kind.to_string()));
        }
        if !self.has_resource(kind) {
            debug!(event = "Guard", phase = "Skip", kind = kind);
            metrics::record_guard(kind, GuardMode::SometimesRequire, true);
            return Ok(GuardOutcome::Continue);
        }
        self.check(kind, GuardMode::SometimesRequire, handler)
    }

    pub fn run_guard<H: NotFoundHandler>(
        &mut self,
        filter: &GuardFilter,
        handler: &H,
    ) -> Result<GuardOutcome<H::Response>, ResourceError> {
        match filter.mode() {
            GuardMode::Require => self.require_resource(filter.kind().as_str(), handler),
            GuardMode::SometimesRequire => {
                self.sometimes_require_resource(filter.kind().as_str(), handler)
            }
        }
    }

    /// Run every filter registered on the controller, in stage order, and
    /// stop at the first halt.
    pub fn run_filters<H: NotFoundHandler>(
        &mut self,
        handler: &H,
    ) -> Result<GuardOutcome<H::Response>, ResourceError> {
        let controller = self.controller;
        for filter in controller.filters() {
            let outcome = self.run_guard(filter, handler)?;
            if outcome.is_halt() {
                return Ok(outcome);
            }
        }
        Ok(GuardOutcome::Continue)
    }
}
