//! In-memory collaborators for scenario tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use itertools::Itertools;

use crate::{
    BackingStore, NotFoundHandler, ResourceError, ResourceKind, RouteArg, RouteOptions, RouteTable,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub class: String,
    pub id: String,
    pub slug: String,
    pub parent: Option<String>,
    pub tags: Vec<String>,
}

impl Record {
    pub fn key(&self) -> String {
        format!("{}:{}", self.class, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Class(String),
    Children { parent: String, class: String },
}

/// An unexecuted query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub source: Source,
    pub scopes: Vec<String>,
}

/// Store that counts and logs every call it receives.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
    associations: HashMap<String, String>,
    pub finds: Cell<usize>,
    pub materializations: Cell<usize>,
    pub log: RefCell<Vec<String>>,
    pub failing: Cell<bool>,
}

impl MemoryStore {
    /// Collections hold categories, categories hold items; some records
    /// carry `visible` / `activated` tags for scope tests.
    pub fn fixture() -> Self {
        let mut store = Self::default();
        store.associations = HashMap::from([
            ("categories".to_string(), "Category".to_string()),
            ("items".to_string(), "Item".to_string()),
        ]);
        store.add("Collection", "1", "books", None, &[]);
        store.add("Collection", "2", "films", None, &[]);
        store.add("Category", "3", "scifi", Some("Collection:1"), &["visible"]);
        store.add("Category", "4", "drama", Some("Collection:2"), &["visible"]);
        store.add("Item", "9", "dune", Some("Category:3"), &["visible", "activated"]);
        store.add("Item", "10", "solaris", Some("Category:3"), &["visible"]);
        store.add("Item", "11", "casablanca", Some("Category:4"), &["visible", "activated"]);
        store.add("Item", "12", "loose", None, &["activated"]);
        store
    }

    fn add(&mut self, class: &str, id: &str, slug: &str, parent: Option<&str>, tags: &[&str]) {
        self.records.push(Record {
            class: class.to_string(),
            id: id.to_string(),
            slug: slug.to_string(),
            parent: parent.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
    }

    pub fn record(&self, class: &str, id: &str) -> Record {
        self.records
            .iter()
            .find(|r| r.class == class && r.id == id)
            .cloned()
            .unwrap()
    }

    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn note(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }

    fn check(&self) -> Result<(), ResourceError> {
        if self.failing.get() {
            return Err(ResourceError::Store("connection refused".to_string()));
        }
        Ok(())
    }

    fn rows(&self, query: &Query) -> Vec<Record> {
        let mut rows: Vec<Record> = self
            .records
            .iter()
            .filter(|r| match &query.source {
                Source::Class(class) => &r.class == class,
                Source::Children { parent, class } => {
                    &r.class == class && r.parent.as_deref() == Some(parent.as_str())
                }
            })
            .cloned()
            .collect();
        for scope in &query.scopes {
            rows.retain(|r| r.tags.contains(scope));
        }
        rows
    }
}

impl BackingStore for MemoryStore {
    type Object = Record;
    type Query = Query;

    fn class_for(&self, class_name: &str) -> Result<Query, ResourceError> {
        self.note(format!("class {class_name}"));
        Ok(Query {
            source: Source::Class(class_name.to_string()),
            scopes: Vec::new(),
        })
    }

    fn find(&self, query: Query, method: &str, id: &str) -> Result<Option<Record>, ResourceError> {
        self.check()?;
        self.finds.set(self.finds.get() + 1);
        self.note(format!("{method} {id}"));
        let rows = self.rows(&query);
        let found = match method {
            "find" => rows.into_iter().find(|r| r.id == id),
            "find_by_slug" => rows.into_iter().find(|r| r.slug == id),
            other => return Err(ResourceError::Store(format!("no finder {other}"))),
        };
        Ok(found)
    }

    fn collection_for(&self, parent: &Record, accessor: &str) -> Result<Query, ResourceError> {
        self.note(format!("{}.{accessor}", parent.key()));
        let class = self
            .associations
            .get(accessor)
            .ok_or_else(|| ResourceError::Store(format!("no association {accessor}")))?;
        Ok(Query {
            source: Source::Children {
                parent: parent.key(),
                class: class.clone(),
            },
            scopes: Vec::new(),
        })
    }

    fn apply_scope(&self, mut query: Query, scope: &str) -> Result<Query, ResourceError> {
        self.note(format!("scope {scope}"));
        query.scopes.push(scope.to_string());
        Ok(query)
    }

    fn materialize_all(&self, query: Query) -> Result<Vec<Record>, ResourceError> {
        self.check()?;
        self.materializations.set(self.materializations.get() + 1);
        self.note("all".to_string());
        Ok(self.rows(&query))
    }

    fn to_param(&self, object: &Record) -> String {
        object.id.clone()
    }
}

/// One call received by [`RecordingRoutes`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCall {
    pub name: String,
    pub args: Vec<String>,
    pub options: RouteOptions,
    pub options_only: bool,
}

/// Route table that renders `/name/arg/arg?key=value` and records calls.
#[derive(Debug, Default)]
pub struct RecordingRoutes {
    pub calls: RefCell<Vec<RouteCall>>,
}

impl RecordingRoutes {
    fn render(name: &str, args: &[String], options: &RouteOptions) -> String {
        let mut url = format!("/{name}");
        for arg in args {
            url.push('/');
            url.push_str(arg);
        }
        if !options.is_empty() {
            url.push('?');
            url.push_str(&options.iter().map(|(k, v)| format!("{k}={v}")).join("&"));
        }
        url
    }

    pub fn last(&self) -> RouteCall {
        self.calls.borrow().last().cloned().unwrap()
    }
}

fn arg_string(arg: &RouteArg<Record>) -> String {
    match arg {
        RouteArg::Object(record) => record.key(),
        RouteArg::Value(value) => value.to_string(),
    }
}

impl RouteTable<Record> for RecordingRoutes {
    fn call(
        &self,
        name: &str,
        args: &[RouteArg<Record>],
        options: &RouteOptions,
    ) -> Result<String, ResourceError> {
        let args: Vec<String> = args.iter().map(arg_string).collect();
        let url = Self::render(name, &args, options);
        self.calls.borrow_mut().push(RouteCall {
            name: name.to_string(),
            args,
            options: options.clone(),
            options_only: false,
        });
        Ok(url)
    }

    fn call_with_options(&self, name: &str, options: &RouteOptions) -> Result<String, ResourceError> {
        let url = Self::render(name, &[], options);
        self.calls.borrow_mut().push(RouteCall {
            name: name.to_string(),
            args: Vec::new(),
            options: options.clone(),
            options_only: true,
        });
        Ok(url)
    }
}

/// Answers a failed guard with a 404 naming the resource.
pub struct NotFound;

impl NotFoundHandler for NotFound {
    type Response = (u16, String);

    fn not_found(&self, kind: &ResourceKind) -> Self::Response {
        (404, format!("{kind} not found"))
    }
}
