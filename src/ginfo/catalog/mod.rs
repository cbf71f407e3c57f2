//! # Attribute Catalog
//!
//! Every attribute the information system publishes is described once, in
//! [`ATTRIBUTES`]. The catalog turns that table into a lookup keyed by every name a
//! user may type:
//!
//! | Form | Example | Used by |
//! |------|---------|---------|
//! | canonical | `EndpointCapability` | positional terms, output headers |
//! | long alias | `cap` | `--cap`, `cap=value` |
//! | short alias | `t` | `-t` |
//!
//! Matching is exact and case-sensitive; there are no prefix matches.
//!
//! When objects are named on the command line, an [`AttributeScope`] also accepts the
//! attribute's label within its object, so `ginfo Endpoint Capability` works.
//!
//! The catalog is built once in `main` and passed explicitly to every stage.

mod kind;
mod spec;

pub use kind::ValueKind;
pub use spec::{AttributeDescriptor, ATTRIBUTES};

use crate::error::{GinfoError, Result};
use crate::model::{ObjectType, View};
use std::collections::HashMap;

#[derive(Debug)]
pub struct Catalog {
    descriptors: &'static [AttributeDescriptor],
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog over `descriptors`.
    ///
    /// # Panics
    ///
    /// Panics if two descriptors share any name form. The table is static, so a clash is
    /// a programming error caught by the catalog tests.
    pub fn new(descriptors: &'static [AttributeDescriptor]) -> Self {
        let mut index = HashMap::new();
        for (position, descriptor) in descriptors.iter().enumerate() {
            let mut keys = vec![
                descriptor.canonical.to_string(),
                descriptor.long_alias.to_string(),
            ];
            if let Some(short) = descriptor.short_alias {
                keys.push(short.to_string());
            }
            keys.dedup();
            for key in keys {
                if let Some(previous) = index.insert(key.clone(), position) {
                    panic!(
                        "attribute name {:?} is claimed by both {} and {}",
                        key, descriptors[previous].canonical, descriptor.canonical
                    );
                }
            }
        }
        Self { descriptors, index }
    }

    /// The catalog of GLUE2 attributes shipped with ginfo.
    pub fn glue2() -> Self {
        Self::new(ATTRIBUTES)
    }

    /// Resolves a canonical name, long alias or short alias.
    pub fn resolve(&self, name: &str) -> Result<&'static AttributeDescriptor> {
        self.lookup(name)
            .ok_or_else(|| GinfoError::UnknownAttribute(name.to_string()))
    }

    fn lookup(&self, name: &str) -> Option<&'static AttributeDescriptor> {
        let descriptors = self.descriptors;
        self.index.get(name).map(|&position| &descriptors[position])
    }

    /// Resolves an LDAP attribute name published by an entry of type `object`.
    pub fn resolve_raw(&self, object: ObjectType, raw_name: &str) -> Option<&'static AttributeDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.object == object && d.raw_name.eq_ignore_ascii_case(raw_name))
    }

    pub fn id_attribute(&self, object: ObjectType) -> Option<&'static AttributeDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.object == object && d.is_id)
    }

    pub fn by_object(&self, object: ObjectType) -> impl Iterator<Item = &'static AttributeDescriptor> {
        self.descriptors.iter().filter(move |d| d.object == object)
    }

    /// Attributes of the joined Service view, in declaration order.
    pub fn service_view(&self) -> impl Iterator<Item = &'static AttributeDescriptor> {
        self.descriptors.iter().filter(|d| d.service_view)
    }

    pub fn list_all(&self) -> &'static [AttributeDescriptor] {
        self.descriptors
    }

    /// Declaration position of a canonical name, used for default column order.
    pub fn position(&self, canonical: &str) -> usize {
        self.descriptors
            .iter()
            .position(|d| d.canonical == canonical)
            .unwrap_or(usize::MAX)
    }

    /// Name resolution for a query over `view`.
    pub fn scope<'a>(&'a self, view: &View) -> AttributeScope<'a> {
        AttributeScope {
            catalog: self,
            objects: view.scoped_objects().to_vec(),
            services: matches!(view, View::Services),
        }
    }
}

/// Name resolution bound to the objects of one query.
#[derive(Debug, Clone)]
pub struct AttributeScope<'a> {
    catalog: &'a Catalog,
    objects: Vec<ObjectType>,
    services: bool,
}

impl<'a> AttributeScope<'a> {
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Resolves `name` globally, then as a label of one of the scoped objects.
    pub fn resolve(&self, name: &str) -> Result<&'static AttributeDescriptor> {
        if let Some(descriptor) = self.catalog.lookup(name) {
            return Ok(descriptor);
        }

        let candidates: Vec<&'static AttributeDescriptor> = self
            .objects
            .iter()
            .flat_map(|object| self.catalog.by_object(*object))
            .filter(|d| d.label == name)
            .collect();

        match candidates.as_slice() {
            [] => Err(GinfoError::UnknownAttribute(name.to_string())),
            [only] => Ok(only),
            many => Err(GinfoError::AmbiguousAttribute {
                token: name.to_string(),
                candidates: many.iter().map(|d| d.canonical.to_string()).collect(),
            }),
        }
    }

    /// Identifier attributes of the records this scope produces.
    pub fn id_attributes(&self) -> Vec<&'static AttributeDescriptor> {
        if self.services {
            return self
                .catalog
                .id_attribute(ObjectType::Service)
                .into_iter()
                .collect();
        }
        self.objects
            .iter()
            .filter_map(|object| self.catalog.id_attribute(*object))
            .collect()
    }
}
