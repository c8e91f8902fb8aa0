//! Route variants, arguments and the plans the synthesizer produces.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Trailing keyword options passed to a route function.
pub type RouteOptions = Map<String, Value>;

/// Options key receiving the composite identifier in the bypass case.
pub const ID_OPTION: &str = "id";

/// Last segment of a generated route name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UrlSuffix {
    Path,
    Url,
}

/// Which route of a resource is requested.
///
/// `Member` and `Edit` address one object and take an item argument, `New`
/// and `Index` never do.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RouteForm {
    Member,
    Edit,
    New,
    Index,
}

impl RouteForm {
    /// Action prefix placed in front of the resource parts.
    pub fn action_prefix(&self) -> Option<&'static str> {
        match self {
            RouteForm::Edit => Some("edit"),
            RouteForm::New => Some("new"),
            RouteForm::Member | RouteForm::Index => None,
        }
    }

    pub fn takes_item(&self) -> bool {
        matches!(self, RouteForm::Member | RouteForm::Edit)
    }

    pub fn is_plural(&self) -> bool {
        matches!(self, RouteForm::Index)
    }
}

/// One fully specified route shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct RouteVariant {
    pub formatted: bool,
    pub form: RouteForm,
    pub suffix: UrlSuffix,
}

impl RouteVariant {
    pub fn new(form: RouteForm, suffix: UrlSuffix) -> Self {
        Self {
            formatted: false,
            form,
            suffix,
        }
    }

    pub fn formatted(mut self) -> Self {
        self.formatted = true;
        self
    }

    pub fn path(form: RouteForm) -> Self {
        Self::new(form, UrlSuffix::Path)
    }

    pub fn url(form: RouteForm) -> Self {
        Self::new(form, UrlSuffix::Url)
    }
}

impl Display for RouteVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.formatted {
            write!(f, "formatted {} {}", self.form, self.suffix)
        } else {
            write!(f, "{} {}", self.form, self.suffix)
        }
    }
}

/// A positional route argument: a resolved backing object or a plain value.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteArg<O> {
    Object(O),
    Value(Value),
}

impl<O> RouteArg<O> {
    pub fn value(value: impl Into<Value>) -> Self {
        RouteArg::Value(value.into())
    }

    pub fn as_object(&self) -> Option<&O> {
        match self {
            RouteArg::Object(object) => Some(object),
            RouteArg::Value(_) => None,
        }
    }
}

/// Extra arguments appended after the resource arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteExtras<O> {
    pub positional: Vec<RouteArg<O>>,
    pub options: RouteOptions,
}

impl<O> Default for RouteExtras<O> {
    fn default() -> Self {
        Self {
            positional: Vec::new(),
            options: RouteOptions::new(),
        }
    }
}

impl<O> RouteExtras<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, arg: RouteArg<O>) -> Self {
        self.positional.push(arg);
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// The call the synthesizer decided on.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutePlan<O> {
    /// Nested route: ancestor objects, optional item, then extra arguments.
    Nested {
        name: String,
        args: Vec<RouteArg<O>>,
        options: RouteOptions,
    },
    /// No active parent: the un-nested route, called with options only.
    Bypass { name: String, options: RouteOptions },
}

impl<O> RoutePlan<O> {
    pub fn name(&self) -> &str {
        match self {
            RoutePlan::Nested { name, .. } | RoutePlan::Bypass { name, .. } => name,
        }
    }

    pub fn options(&self) -> &RouteOptions {
        match self {
            RoutePlan::Nested { options, .. } | RoutePlan::Bypass { options, .. } => options,
        }
    }

    pub fn is_bypass(&self) -> bool {
        matches!(self, RoutePlan::Bypass { .. })
    }
}
