//! The query pipeline: `normalize → filter → project → clean → render`.
//!
//! Planning and execution are split so that every name the user typed is resolved,
//! and every option conflict settled, before anything is fetched. A plan that fails
//! has processed zero records.

use super::clean::{clean, Allowlist};
use super::filter::Filter;
use super::normalize::normalize;
use super::project::{group, project_columns, resolve_columns};
use super::render::render;
use super::{Format, Message, Output, ProjectionMode, QueryRequest, RenderOptions, Severity};
use crate::catalog::{AttributeDescriptor, Catalog};
use crate::error::Result;
use crate::model::{ObjectType, RawEntry, View};

#[derive(Debug, Clone)]
enum Projection {
    Columns(Vec<&'static AttributeDescriptor>),
    Distinct(&'static AttributeDescriptor),
}

/// A fully resolved query, ready to run against fetched entries.
#[derive(Debug, Clone)]
pub struct Plan<'a> {
    catalog: &'a Catalog,
    view: View,
    filter: Filter,
    projection: Projection,
    options: RenderOptions,
    allowlist: Allowlist,
    messages: Vec<Message>,
}

/// The outcome of running a query.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub output: Output,
    pub rendered: String,
    pub messages: Vec<Message>,
    /// Records that survived filtering.
    pub record_count: usize,
}

pub fn plan<'a>(catalog: &'a Catalog, request: &QueryRequest) -> Result<Plan<'a>> {
    let scope = catalog.scope(&request.view);
    let filter = Filter::compile(&scope, &request.constraints)?;
    let mut options = request.options;
    let mut messages = Vec::new();

    let projection = match &request.projection.mode {
        ProjectionMode::Filter => {
            Projection::Columns(resolve_columns(&scope, &request.projection.display)?)
        }
        ProjectionMode::ListDistinct { attribute } => {
            let attribute = scope.resolve(attribute)?;
            if !request.projection.display.is_empty() {
                messages.push(Message::warning(format!(
                    "Attribute(s) {} ignored: not compatible with --list option.",
                    request.projection.display.join(" ")
                )));
            }
            if matches!(options.format, Format::Csv | Format::Emi) {
                messages.push(Message::warning(format!(
                    "Option --{} is not compatible with --list option.",
                    options.format.name()
                )));
                options.format = Format::Plain;
            }
            Projection::Distinct(attribute)
        }
    };

    let mut allowlist = Allowlist::new();
    for descriptor in scope.id_attributes() {
        allowlist.insert(descriptor);
    }
    for descriptor in filter.exact_attributes() {
        allowlist.insert(descriptor);
    }
    if let Projection::Distinct(attribute) = &projection {
        allowlist.insert(*attribute);
    }

    if options.verbose {
        match options.severity {
            Severity::None => {}
            Severity::Clean => messages.push(Message::info("Results have been cleaned.")),
            Severity::Strict => {
                messages.push(Message::info("Results have been cleaned strictly."))
            }
        }
        let subject = match request.view {
            View::Services => "services",
            View::Objects(_) => "objects",
        };
        for (attribute, patterns) in filter.constraints() {
            messages.push(Message::info(format!(
                "Filter {} by the following {}: {}",
                subject,
                attribute.canonical,
                patterns.join(", ")
            )));
        }
        match &projection {
            Projection::Columns(columns) if !columns.is_empty() => {
                let names: Vec<&str> = columns.iter().map(|c| c.canonical).collect();
                messages.push(Message::info(format!(
                    "The following attribute(s) will be displayed: {}",
                    names.join(" ")
                )));
            }
            Projection::Columns(_) => {}
            Projection::Distinct(attribute) => messages.push(Message::info(format!(
                "List all the possible values for the following attribute: {}",
                attribute.canonical
            ))),
        }
    }

    Ok(Plan {
        catalog,
        view: request.view.clone(),
        filter,
        projection,
        options,
        allowlist,
        messages,
    })
}

impl Plan<'_> {
    /// Object types the directory has to return for this plan.
    pub fn fetch_objects(&self) -> Vec<ObjectType> {
        self.view.fetch_objects()
    }

    /// Render options after conflicts were resolved.
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Messages produced while planning.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn execute(&self, entries: &[RawEntry]) -> Result<QueryResult> {
        let mut messages = self.messages.clone();
        let normalized = normalize(self.catalog, entries, &self.view);
        if self.options.verbose {
            messages.extend(
                normalized
                    .dropped
                    .iter()
                    .map(|dropped| Message::warning(dropped.to_string())),
            );
        }

        let records = self.filter.apply(normalized.records);
        let record_count = records.len();
        let severity = self.options.severity;

        let output = match &self.projection {
            Projection::Columns(columns) => {
                let set = project_columns(self.catalog, records, columns.clone());
                Output::Table(clean(set, severity, &self.allowlist))
            }
            Projection::Distinct(attribute) => {
                let set = project_columns(self.catalog, records, vec![*attribute]);
                let set = clean(set, severity, &self.allowlist);
                Output::Distinct(group(&set, *attribute))
            }
        };

        let rendered = render(&output, self.options.format)?;
        Ok(QueryResult {
            output,
            rendered,
            messages,
            record_count,
        })
    }
}

/// Plans and runs `request` over already-fetched entries.
pub fn run(catalog: &Catalog, entries: &[RawEntry], request: &QueryRequest) -> Result<QueryResult> {
    plan(catalog, request)?.execute(entries)
}
