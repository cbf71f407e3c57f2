//! # CLI Layer
//!
//! This module is **one possible UI client** for ginfo; it is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Reads the environment and the config file
//! - Turns shell arguments into a [`QueryRequest`]
//!
//! ## Term Classification
//!
//! Positional terms are sorted by shape:
//! - an object type name (`Endpoint`) selects objects instead of services
//! - `attribute=value` is a filter, like the matching `--attribute value` flag
//! - anything else is an attribute to display
//!
//! ## Defaults
//!
//! Host, bind, timeout and LDIF path come from the command line first, then the
//! environment (`LCG_GFAL_INFOSYS`, `GINFO_LDIF`), then `config.json`, then the
//! built-in defaults.

use super::print::{format_available_attributes, format_object_attributes, print_messages};
use super::setup::{command, parse_from, Invocation};
use ginfo::api::GinfoApi;
use ginfo::catalog::Catalog;
use ginfo::config::{config_dir, GinfoConfig};
use ginfo::directory::ldif::LdifDirectory;
use ginfo::directory::{normalize_host, FetchRequest};
use ginfo::engine::{
    Constraint, Format, ProjectionMode, ProjectionRequest, QueryRequest, RenderOptions, Severity,
};
use ginfo::error::{GinfoError, Result};
use ginfo::model::{ObjectType, View};
use std::time::Duration;

pub fn run() -> Result<()> {
    let catalog = Catalog::glue2();
    let invocation = parse_from(&catalog, std::env::args_os()).unwrap_or_else(|e| e.exit());
    let cli = &invocation.cli;

    if cli.list_available_attributes || cli.list.as_deref() == Some("") {
        print!("{}", format_available_attributes(&catalog));
        return Ok(());
    }
    if let Some(object) = cli.list.as_deref().and_then(|v| v.parse::<ObjectType>().ok()) {
        print!("{}", format_object_attributes(&catalog, object));
        return Ok(());
    }

    let config = load_config();
    let host = cli
        .host
        .clone()
        .or_else(|| config.host.clone())
        .and_then(|raw| normalize_host(&raw));
    let ldif = cli.ldif.clone().or_else(|| config.ldif.clone());

    let ldif = match (ldif, host.as_deref()) {
        (Some(ldif), _) => ldif,
        (None, None) => {
            command(&catalog).print_help()?;
            return Ok(());
        }
        (None, Some(host)) => {
            return Err(GinfoError::FetchFailure {
                host: host.to_string(),
                reason: "no LDAP client is available; query an LDIF snapshot with --ldif".into(),
            })
        }
    };
    let host = host.unwrap_or_else(|| ldif.display().to_string());

    let request = build_request(&invocation);
    let fetch = FetchRequest::new(host, Vec::new())
        .with_bind(cli.bind.clone().unwrap_or(config.bind))
        .with_timeout(Duration::from_secs(cli.timeout.unwrap_or(config.timeout)));

    log::debug!("querying {} ({}) with {:?}", fetch.host, ldif.display(), request);
    let api = GinfoApi::new(LdifDirectory::new(ldif), catalog);
    let result = api.query(&fetch, &request)?;

    if print_messages(&result.messages) {
        println!();
    }
    print!("{}", result.rendered);
    Ok(())
}

/// Reads `config.json`; a missing or unreadable file falls back to defaults.
fn load_config() -> GinfoConfig {
    let Some(dir) = config_dir() else {
        return GinfoConfig::default();
    };
    GinfoConfig::load(&dir).unwrap_or_else(|e| {
        log::warn!("ignoring configuration: {}", e);
        GinfoConfig::default()
    })
}

fn build_request(invocation: &Invocation) -> QueryRequest {
    let cli = &invocation.cli;
    let mut objects: Vec<ObjectType> = Vec::new();
    let mut constraints = invocation.flag_constraints.clone();
    let mut display = Vec::new();

    for (index, term) in &invocation.terms {
        if let Ok(object) = term.parse::<ObjectType>() {
            if !objects.contains(&object) {
                objects.push(object);
            }
        } else if let Some(constraint) = Constraint::parse(term) {
            constraints.push((*index, constraint));
        } else {
            display.push(term.clone());
        }
    }
    constraints.sort_by_key(|(index, _)| *index);

    let view = if objects.is_empty() {
        View::Services
    } else {
        View::Objects(objects)
    };
    let mode = match cli.list.as_deref() {
        Some(attribute) if !attribute.is_empty() => ProjectionMode::ListDistinct {
            attribute: attribute.to_string(),
        },
        _ => ProjectionMode::Filter,
    };
    let format = if cli.json {
        Format::Json
    } else if cli.csv {
        Format::Csv
    } else if cli.emi {
        Format::Emi
    } else {
        Format::Plain
    };
    let severity = if cli.strict {
        Severity::Strict
    } else if cli.clean {
        Severity::Clean
    } else {
        Severity::None
    };

    QueryRequest {
        view,
        constraints: constraints.into_iter().map(|(_, c)| c).collect(),
        projection: ProjectionRequest { display, mode },
        options: RenderOptions {
            format,
            severity,
            verbose: cli.verbose,
        },
    }
}
