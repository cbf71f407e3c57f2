//! # Query Engine
//!
//! Pure transformation from directory entries to rendered text:
//!
//! ```text
//! RawEntry* ─normalize─▶ Record* ─filter─▶ Record* ─project─▶ ResultSet ─clean─▶ ResultSet ─render─▶ String
//!                                                      │
//!                                                      └─(list mode)─▶ Distinct ─render─▶ String
//! ```
//!
//! Each stage lives in its own module and takes the [`Catalog`](crate::catalog::Catalog)
//! or an [`AttributeScope`](crate::catalog::AttributeScope) explicitly. Stages never
//! mutate their inputs and never touch stdout; the only I/O of a query is the fetch,
//! which happens before the engine runs.
//!
//! [`query`] wires the stages together behind a single branch point, the
//! [`ProjectionMode`].

use crate::catalog::AttributeDescriptor;
use crate::model::{Record, View};

pub mod clean;
pub mod emi;
pub mod filter;
pub mod normalize;
pub mod project;
pub mod query;
pub mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
}

/// A user-facing message produced while running a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub content: String,
}

impl Message {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// An attribute/value filter as typed by the user.
///
/// `attribute` may be any name form; `pattern` is a literal or a `*` glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub attribute: String,
    pub pattern: String,
}

impl Constraint {
    pub fn new(attribute: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            pattern: pattern.into(),
        }
    }

    /// Parses an `attribute=pattern` term. Returns `None` when there is no `=`.
    pub fn parse(term: &str) -> Option<Self> {
        term.split_once('=')
            .map(|(attribute, pattern)| Self::new(attribute, pattern))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Filter,
    ListDistinct {
        attribute: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectionRequest {
    /// Attributes to display, in order. Empty means every attribute present.
    pub display: Vec<String>,
    pub mode: ProjectionMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Plain,
    Csv,
    Json,
    Emi,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Plain => "plain",
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Emi => "emi",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    None,
    Clean,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub format: Format,
    pub severity: Severity,
    pub verbose: bool,
}

/// Everything the engine needs to answer one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub view: View,
    pub constraints: Vec<Constraint>,
    pub projection: ProjectionRequest,
    pub options: RenderOptions,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            view: View::Services,
            constraints: Vec::new(),
            projection: ProjectionRequest::default(),
            options: RenderOptions::default(),
        }
    }
}

/// Projected records ready to be cleaned and rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<&'static AttributeDescriptor>,
    pub records: Vec<Record>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One distinct value and the ids of the records holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistinctValue {
    pub value: String,
    pub ids: Vec<String>,
}

/// Distinct values of one attribute, in first-encounter order.
#[derive(Debug, Clone, PartialEq)]
pub struct Distinct {
    pub attribute: &'static AttributeDescriptor,
    pub groups: Vec<DistinctValue>,
}

impl Distinct {
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.value.as_str())
    }

    pub fn ids_of(&self, value: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|group| group.value == value)
            .map(|group| group.ids.as_slice())
    }
}

/// The structured result of the projection stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Table(ResultSet),
    Distinct(Distinct),
}
