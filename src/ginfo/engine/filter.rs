//! Attribute/value filtering.
//!
//! Constraints are grouped by the attribute they resolve to, whatever name form was
//! used (`--vo ALL` and `PolicyRule=VO:*` land in the same group). A record matches
//! when every group matches (AND), and a group matches when any of its patterns
//! matches any of the record's values for that attribute (OR, with containment for
//! multi-valued attributes).

use super::Constraint;
use crate::catalog::{AttributeDescriptor, AttributeScope};
use crate::error::Result;
use crate::model::Record;
use regex::Regex;

/// A value pattern: a literal, or a glob where `*` matches any run of characters.
#[derive(Debug, Clone)]
pub enum Pattern {
    Exact(String),
    Wildcard { source: String, regex: Regex },
}

impl Pattern {
    pub fn new(source: &str) -> Self {
        if !source.contains('*') {
            return Pattern::Exact(source.to_string());
        }
        let body = source
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        // Escaped literals joined by `.*` always form a valid expression.
        match Regex::new(&format!("(?s)^{}$", body)) {
            Ok(regex) => Pattern::Wildcard {
                source: source.to_string(),
                regex,
            },
            Err(_) => Pattern::Exact(source.to_string()),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Exact(literal) => literal == value,
            Pattern::Wildcard { regex, .. } => regex.is_match(value),
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Pattern::Exact(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Exact(literal) => literal,
            Pattern::Wildcard { source, .. } => source,
        }
    }
}

#[derive(Debug, Clone)]
struct Group {
    attribute: &'static AttributeDescriptor,
    patterns: Vec<Pattern>,
}

impl Group {
    fn matches(&self, record: &Record) -> bool {
        let Some(values) = record.get(self.attribute.canonical) else {
            return false;
        };
        self.patterns
            .iter()
            .any(|pattern| values.iter().any(|value| pattern.matches(value)))
    }
}

/// A compiled set of constraints.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    groups: Vec<Group>,
}

impl Filter {
    /// Resolves every constraint attribute up front.
    ///
    /// An unknown attribute fails here, before any record is looked at.
    pub fn compile(scope: &AttributeScope<'_>, constraints: &[Constraint]) -> Result<Self> {
        let mut groups: Vec<Group> = Vec::new();
        for constraint in constraints {
            let attribute = scope.resolve(&constraint.attribute)?;
            let pattern = Pattern::new(&constraint.pattern);
            match groups
                .iter_mut()
                .find(|g| g.attribute.canonical == attribute.canonical)
            {
                Some(group) => group.patterns.push(pattern),
                None => groups.push(Group {
                    attribute,
                    patterns: vec![pattern],
                }),
            }
        }
        Ok(Self { groups })
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.groups.iter().all(|group| group.matches(record))
    }

    /// Keeps the matching records, in their original order.
    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        if self.is_empty() {
            return records;
        }
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }

    /// Attributes constrained by at least one literal (non-wildcard) pattern.
    pub fn exact_attributes(&self) -> impl Iterator<Item = &'static AttributeDescriptor> + '_ {
        self.groups
            .iter()
            .filter(|group| group.patterns.iter().any(Pattern::is_exact))
            .map(|group| group.attribute)
    }

    /// Each constrained attribute with its patterns, in first-mention order.
    pub fn constraints(&self) -> impl Iterator<Item = (&'static AttributeDescriptor, Vec<&str>)> + '_ {
        self.groups.iter().map(|group| {
            (
                group.attribute,
                group.patterns.iter().map(Pattern::as_str).collect(),
            )
        })
    }
}

/// Compiles `constraints` and keeps the matching records.
pub fn apply(scope: &AttributeScope<'_>, records: Vec<Record>, constraints: &[Constraint]) -> Result<Vec<Record>> {
    Ok(Filter::compile(scope, constraints)?.apply(records))
}
