//! Projection: choosing display columns, or pivoting records into distinct values.

use super::{Distinct, DistinctValue, ResultSet};
use crate::catalog::{AttributeDescriptor, AttributeScope, Catalog};
use crate::error::Result;
use crate::model::Record;
use std::collections::{HashMap, HashSet};

/// Resolves the requested display names.
///
/// Duplicates (including different names for the same attribute) keep their first
/// position.
pub fn resolve_columns(scope: &AttributeScope<'_>, names: &[String]) -> Result<Vec<&'static AttributeDescriptor>> {
    let mut columns: Vec<&'static AttributeDescriptor> = Vec::new();
    for name in names {
        let descriptor = scope.resolve(name)?;
        if !columns.iter().any(|c| c.canonical == descriptor.canonical) {
            columns.push(descriptor);
        }
    }
    Ok(columns)
}

/// Every attribute present on at least one record: identifiers first, then catalog order.
pub fn default_columns(catalog: &Catalog, records: &[Record]) -> Vec<&'static AttributeDescriptor> {
    let mut columns: Vec<&'static AttributeDescriptor> = Vec::new();
    for record in records {
        for name in record.names() {
            if columns.iter().any(|c| c.canonical == name) {
                continue;
            }
            if let Ok(descriptor) = catalog.resolve(name) {
                columns.push(descriptor);
            }
        }
    }
    columns.sort_by_key(|d| (!d.is_id, catalog.position(d.canonical)));
    columns
}

/// Restricts `records` to `columns`. An empty column list selects the default columns.
pub fn project_columns(catalog: &Catalog, records: Vec<Record>, columns: Vec<&'static AttributeDescriptor>) -> ResultSet {
    let columns = if columns.is_empty() {
        default_columns(catalog, &records)
    } else {
        columns
    };
    let records = records
        .iter()
        .map(|record| record.restricted_to(&columns))
        .collect();
    ResultSet { columns, records }
}

pub fn project(scope: &AttributeScope<'_>, records: Vec<Record>, names: &[String]) -> Result<ResultSet> {
    let columns = resolve_columns(scope, names)?;
    Ok(project_columns(scope.catalog(), records, columns))
}

/// A single-column result set holding only `name`.
pub fn select(scope: &AttributeScope<'_>, records: Vec<Record>, name: &str) -> Result<ResultSet> {
    let attribute = scope.resolve(name)?;
    Ok(project_columns(scope.catalog(), records, vec![attribute]))
}

/// Groups every value of `attribute` with the ids of the records holding it.
///
/// A record with several values appears under each of them; a record listing the same
/// value twice is recorded once.
pub fn group(set: &ResultSet, attribute: &'static AttributeDescriptor) -> Distinct {
    let mut groups: Vec<DistinctValue> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut seen: HashSet<(usize, &str)> = HashSet::new();
    for record in &set.records {
        let Some(values) = record.get(attribute.canonical) else {
            continue;
        };
        for value in values {
            let position = *positions.entry(value.as_str()).or_insert_with(|| {
                groups.push(DistinctValue {
                    value: value.clone(),
                    ids: Vec::new(),
                });
                groups.len() - 1
            });
            if seen.insert((position, record.id())) {
                groups[position].ids.push(record.id().to_string());
            }
        }
    }
    Distinct { attribute, groups }
}

pub fn list_distinct(scope: &AttributeScope<'_>, records: Vec<Record>, name: &str) -> Result<Distinct> {
    let attribute = scope.resolve(name)?;
    let set = project_columns(scope.catalog(), records, vec![attribute]);
    Ok(group(&set, attribute))
}
