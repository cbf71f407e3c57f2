//! Core data types: object types, raw directory entries and normalized records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::catalog::AttributeDescriptor;

/// The kinds of infrastructure objects published by the information system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectType {
    AccessPolicy,
    AdminDomain,
    ComputingManager,
    ComputingShare,
    Endpoint,
    ExecutionEnvironment,
    Location,
    MappingPolicy,
    Service,
    Share,
    StorageShare,
}

impl ObjectType {
    pub const ALL: [ObjectType; 11] = [
        ObjectType::AccessPolicy,
        ObjectType::AdminDomain,
        ObjectType::ComputingManager,
        ObjectType::ComputingShare,
        ObjectType::Endpoint,
        ObjectType::ExecutionEnvironment,
        ObjectType::Location,
        ObjectType::MappingPolicy,
        ObjectType::Service,
        ObjectType::Share,
        ObjectType::StorageShare,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ObjectType::AccessPolicy => "AccessPolicy",
            ObjectType::AdminDomain => "AdminDomain",
            ObjectType::ComputingManager => "ComputingManager",
            ObjectType::ComputingShare => "ComputingShare",
            ObjectType::Endpoint => "Endpoint",
            ObjectType::ExecutionEnvironment => "ExecutionEnvironment",
            ObjectType::Location => "Location",
            ObjectType::MappingPolicy => "MappingPolicy",
            ObjectType::Service => "Service",
            ObjectType::Share => "Share",
            ObjectType::StorageShare => "StorageShare",
        }
    }

    /// The LDAP objectClass carried by entries of this type (e.g. `GLUE2Endpoint`).
    pub fn object_class(&self) -> String {
        format!("GLUE2{}", self.name())
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .iter()
            .copied()
            .find(|object| object.name() == s)
            .ok_or_else(|| format!("Unknown object type: {}", s))
    }
}

/// How directory entries are turned into records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// One record per service, joined with its endpoints and their access policies.
    Services,
    /// One record per entry of each listed object type.
    Objects(Vec<ObjectType>),
}

impl View {
    /// Object types that must be fetched to build this view.
    pub fn fetch_objects(&self) -> Vec<ObjectType> {
        match self {
            View::Services => vec![
                ObjectType::Service,
                ObjectType::Endpoint,
                ObjectType::AccessPolicy,
            ],
            View::Objects(objects) => objects.clone(),
        }
    }

    /// Object types whose attributes may be named by their in-object label.
    pub fn scoped_objects(&self) -> &[ObjectType] {
        match self {
            View::Services => &[],
            View::Objects(objects) => objects,
        }
    }
}

/// A directory entry as handed over by a [`crate::directory::Directory`].
///
/// Attribute names are kept as received; lookups ignore ASCII case like LDAP does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub dn: Option<String>,
    attributes: Vec<(String, Vec<String>)>,
}

impl RawEntry {
    pub fn new(dn: Option<String>) -> Self {
        Self {
            dn,
            attributes: Vec::new(),
        }
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: &str, value: impl Into<String>) {
        match self
            .attributes
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, values)) => values.push(value.into()),
            None => self
                .attributes
                .push((name.to_string(), vec![value.into()])),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.attributes
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn has_object_class(&self, object: ObjectType) -> bool {
        let class = object.object_class();
        self.get("objectClass")
            .map(|classes| classes.iter().any(|c| c.eq_ignore_ascii_case(&class)))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.dn.is_none() && self.attributes.is_empty()
    }
}

/// A normalized directory object: canonical attribute names mapped to ordered values.
///
/// Records expose no public mutators; pipeline stages build new records instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    object: ObjectType,
    id: String,
    values: BTreeMap<&'static str, Vec<String>>,
}

impl Record {
    pub fn new(object: ObjectType, id: impl Into<String>) -> Self {
        Self {
            object,
            id: id.into(),
            values: BTreeMap::new(),
        }
    }

    /// Returns a copy of this record with `name` set to `values`.
    pub fn with<V: Into<String>>(
        mut self,
        name: &'static str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.values
            .insert(name, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn object(&self) -> ObjectType {
        self.object
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.values.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.values
            .iter()
            .map(|(name, values)| (*name, values.as_slice()))
    }

    /// Returns a new record holding only the listed attributes that are present here.
    pub fn restricted_to(&self, columns: &[&'static AttributeDescriptor]) -> Record {
        let values = columns
            .iter()
            .filter_map(|column| {
                self.values
                    .get(column.canonical)
                    .map(|values| (column.canonical, values.clone()))
            })
            .collect();
        Record {
            object: self.object,
            id: self.id.clone(),
            values,
        }
    }

    /// Adds the values one source entry holds for `descriptor`.
    ///
    /// Multi-valued attributes take every value. Single-valued ones take the entry's
    /// first value. Either way the values accumulate across entries in arrival order,
    /// so a service joined from several endpoints keeps every endpoint's URL.
    pub(crate) fn append(&mut self, descriptor: &'static AttributeDescriptor, values: &[String]) {
        let slot = self.values.entry(descriptor.canonical).or_default();
        if descriptor.multi_valued {
            slot.extend(values.iter().cloned());
            return;
        }
        let Some((first, extra)) = values.split_first() else {
            return;
        };
        slot.push(first.clone());
        for value in extra {
            log::debug!(
                "{} {}: dropping extra value {:?} for single-valued {}",
                self.object,
                self.id,
                value,
                descriptor.canonical
            );
        }
    }
}
