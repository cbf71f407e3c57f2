//! # API Facade
//!
//! The API layer is a **thin facade** over the engine. It is the single entry point
//! for ginfo queries, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Plans** the query, so unknown attributes fail before any fetch
//! - **Fetches** entries from the [`Directory`] exactly once
//! - **Returns structured types** (`Result<QueryResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Query logic**: That belongs in `engine/*.rs`
//! - **I/O operations**: No stdout, stderr, or exit codes
//!
//! ## Generic Over Directory
//!
//! `GinfoApi<D: Directory>` is generic over the directory backend:
//! - Production: `GinfoApi<LdifDirectory>`
//! - Testing: `GinfoApi<InMemoryDirectory>`

use crate::catalog::{AttributeDescriptor, Catalog};
use crate::directory::{Directory, FetchRequest};
use crate::engine::query::{self, QueryResult};
use crate::engine::{Format, Message, QueryRequest};
use crate::error::Result;
use crate::model::ObjectType;

pub use crate::engine::{
    Constraint, MessageLevel, Output, ProjectionMode, ProjectionRequest, RenderOptions, Severity,
};

/// The main API facade for ginfo queries.
pub struct GinfoApi<D: Directory> {
    directory: D,
    catalog: Catalog,
}

impl<D: Directory> GinfoApi<D> {
    pub fn new(directory: D, catalog: Catalog) -> Self {
        Self { directory, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Catalogued attributes, optionally restricted to one object type.
    pub fn attributes(&self, object: Option<ObjectType>) -> Vec<&'static AttributeDescriptor> {
        match object {
            Some(object) => self.catalog.by_object(object).collect(),
            None => self.catalog.list_all().iter().collect(),
        }
    }

    /// Runs `request` against the entries fetched for `fetch`.
    ///
    /// The object types in `fetch` are replaced by the ones the query's view needs.
    pub fn query(&self, fetch: &FetchRequest, request: &QueryRequest) -> Result<QueryResult> {
        let plan = query::plan(&self.catalog, request)?;
        let fetch = FetchRequest {
            objects: plan.fetch_objects(),
            ..fetch.clone()
        };

        let entries = self.directory.fetch(&fetch)?;
        log::info!("fetched {} entries from {}", entries.len(), fetch.host);

        let mut result = plan.execute(&entries)?;
        if request.options.verbose {
            let mut preamble = vec![Message::info("Verbose mode enabled")];
            match plan.options().format {
                Format::Plain => {}
                format => preamble.push(Message::info(format!(
                    "Output in {} formating",
                    format.name()
                ))),
            }
            preamble.push(Message::info(format!(
                "The following host will be used: {}",
                fetch.host
            )));
            preamble.push(Message::info(format!(
                "Ldap timeout has been set to {} second(s).",
                fetch.timeout.as_secs()
            )));
            preamble.append(&mut result.messages);
            result.messages = preamble;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::memory::fixtures;
    use crate::error::GinfoError;
    use crate::model::{RawEntry, View};
    use std::cell::Cell;
    use std::time::Duration;

    /// Counts fetches, to check that failed plans never reach the directory.
    struct CountingDirectory {
        fetches: Cell<usize>,
    }

    impl Directory for CountingDirectory {
        fn fetch(&self, _request: &FetchRequest) -> Result<Vec<RawEntry>> {
            self.fetches.set(self.fetches.get() + 1);
            Ok(Vec::new())
        }
    }

    fn api() -> GinfoApi<crate::directory::memory::InMemoryDirectory> {
        GinfoApi::new(fixtures::legacy_directory(), Catalog::glue2())
    }

    fn fetch() -> FetchRequest {
        FetchRequest::new("bdii.example.org:2170", Vec::new())
    }

    #[test]
    fn query_runs_the_pipeline() {
        let request = QueryRequest {
            constraints: vec![Constraint::new("domain", "domain_a")],
            projection: ProjectionRequest {
                display: vec!["id".into()],
                mode: ProjectionMode::Filter,
            },
            ..QueryRequest::default()
        };
        let result = api().query(&fetch(), &request).unwrap();
        assert_eq!(result.rendered, "ServiceID: service_1\n\nServiceID: service_2\n");
        assert_eq!(result.record_count, 2);
    }

    #[test]
    fn objects_view_fetches_requested_objects() {
        let request = QueryRequest {
            view: View::Objects(vec![ObjectType::StorageShare]),
            projection: ProjectionRequest {
                display: vec!["Path".into()],
                mode: ProjectionMode::Filter,
            },
            ..QueryRequest::default()
        };
        let result = api().query(&fetch(), &request).unwrap();
        assert_eq!(
            result.rendered,
            "StorageSharePath: /dpm/example.org/home/atlas\n"
        );
    }

    #[test]
    fn unknown_attribute_never_fetches() {
        let directory = CountingDirectory {
            fetches: Cell::new(0),
        };
        let api = GinfoApi::new(directory, Catalog::glue2());
        let request = QueryRequest {
            constraints: vec![Constraint::new("colour", "red")],
            ..QueryRequest::default()
        };
        assert!(matches!(
            api.query(&fetch(), &request),
            Err(GinfoError::UnknownAttribute(_))
        ));
        assert_eq!(api.directory.fetches.get(), 0);

        api.query(&fetch(), &QueryRequest::default()).unwrap();
        assert_eq!(api.directory.fetches.get(), 1);
    }

    #[test]
    fn verbose_preamble_comes_first() {
        let mut request = QueryRequest::default();
        request.options.verbose = true;
        request.options.format = Format::Csv;
        request.options.severity = Severity::Strict;
        let fetch = fetch().with_timeout(Duration::from_secs(3));

        let result = api().query(&fetch, &request).unwrap();
        let contents: Vec<&str> = result.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            &contents[..5],
            &[
                "Verbose mode enabled",
                "Output in csv formating",
                "The following host will be used: bdii.example.org:2170",
                "Ldap timeout has been set to 3 second(s).",
                "Results have been cleaned strictly.",
            ]
        );
    }

    #[test]
    fn attribute_listing() {
        let api = api();
        assert_eq!(api.attributes(None).len(), api.catalog().list_all().len());
        let location: Vec<_> = api
            .attributes(Some(ObjectType::Location))
            .iter()
            .map(|d| d.label)
            .collect();
        assert_eq!(location, vec!["ID", "Country", "Latitude", "Longitude"]);
    }
}
