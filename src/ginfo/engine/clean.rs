//! Rewriting invalid values to a sentinel.
//!
//! - `Clean`: each value is checked on its own; a failing value becomes [`SENTINEL`].
//! - `Strict`: attributes outside the [`Allowlist`] become all-sentinel, and a
//!   multi-valued attribute with any invalid member becomes all-sentinel.
//!
//! The sentinel itself counts as invalid, so cleaning twice changes nothing.
//! Cleaning rewrites values only; columns and records are never added or removed.

use super::{ResultSet, Severity};
use crate::catalog::AttributeDescriptor;
use crate::model::Record;
use std::collections::HashSet;

pub const SENTINEL: &str = "INVALID";

/// Attributes that keep their values under `Strict`.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    names: HashSet<&'static str>,
}

impl Allowlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, descriptor: &'static AttributeDescriptor) {
        self.names.insert(descriptor.canonical);
    }

    pub fn with(mut self, descriptor: &'static AttributeDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.names.contains(canonical)
    }
}

fn is_valid(descriptor: &AttributeDescriptor, value: &str) -> bool {
    value != SENTINEL && descriptor.is_valid(value)
}

fn clean_values(descriptor: &AttributeDescriptor, values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| {
            if is_valid(descriptor, value) {
                value.clone()
            } else {
                SENTINEL.to_string()
            }
        })
        .collect()
}

fn strict_values(descriptor: &AttributeDescriptor, values: &[String], allowed: bool) -> Vec<String> {
    let poisoned = !allowed
        || (descriptor.multi_valued && values.iter().any(|value| !is_valid(descriptor, value)));
    if poisoned {
        return vec![SENTINEL.to_string(); values.len()];
    }
    clean_values(descriptor, values)
}

fn clean_record(record: &Record, columns: &[&'static AttributeDescriptor], severity: Severity, allowlist: &Allowlist) -> Record {
    let mut cleaned = Record::new(record.object(), record.id());
    for (name, values) in record.iter() {
        let Some(descriptor) = columns.iter().find(|d| d.canonical == name) else {
            cleaned = cleaned.with(name, values.iter().cloned());
            continue;
        };
        let values = match severity {
            Severity::None => values.to_vec(),
            Severity::Clean => clean_values(descriptor, values),
            Severity::Strict => strict_values(descriptor, values, allowlist.contains(name)),
        };
        cleaned = cleaned.with(name, values);
    }
    cleaned
}

pub fn clean(set: ResultSet, severity: Severity, allowlist: &Allowlist) -> ResultSet {
    if severity == Severity::None {
        return set;
    }
    let records = set
        .records
        .iter()
        .map(|record| clean_record(record, &set.columns, severity, allowlist))
        .collect();
    ResultSet {
        columns: set.columns,
        records,
    }
}
