//! Turns raw directory entries into [`Record`]s keyed by canonical attribute names.
//!
//! Two views are supported:
//!
//! - **Objects**: every entry carrying `GLUE2<Type>` for a requested type becomes one
//!   record of that type, with all of its catalogued attributes.
//! - **Services**: the legacy joined view. Each service becomes one record, and the
//!   service-view attributes of its endpoints and of those endpoints' access policies
//!   are folded into it.
//!
//! Raw attribute names the catalog does not know are skipped. Entries that cannot
//! produce a record (no identifier, or a dangling reference in the joined view) are
//! reported back as [`MalformedRecord`]s rather than failing the query.

use crate::catalog::{AttributeDescriptor, Catalog};
use crate::model::{ObjectType, RawEntry, Record, View};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The entry has no (or an empty) identifier attribute.
    MissingId,
    /// The entry references an object that was not fetched.
    Unlinked {
        target: ObjectType,
        key: Option<String>,
    },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::MissingId => f.write_str("missing identifier"),
            DropReason::Unlinked { target, key: None } => {
                write!(f, "no {} reference", target)
            }
            DropReason::Unlinked {
                target,
                key: Some(key),
            } => write!(f, "references unknown {} {}", target, key),
        }
    }
}

/// An entry that was discarded during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    pub dn: Option<String>,
    pub object: ObjectType,
    pub reason: DropReason,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ignoring {} entry {}: {}",
            self.object,
            self.dn.as_deref().unwrap_or("<no dn>"),
            self.reason
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<Record>,
    pub dropped: Vec<MalformedRecord>,
}

pub fn normalize(catalog: &Catalog, entries: &[RawEntry], view: &View) -> Normalized {
    let normalized = match view {
        View::Objects(objects) => normalize_objects(catalog, entries, objects),
        View::Services => normalize_services(catalog, entries),
    };
    for dropped in &normalized.dropped {
        log::info!("{}", dropped);
    }
    normalized
}

fn normalize_objects(catalog: &Catalog, entries: &[RawEntry], objects: &[ObjectType]) -> Normalized {
    let mut normalized = Normalized::default();
    for entry in entries {
        for &object in objects {
            if !entry.has_object_class(object) {
                continue;
            }
            match entry_id(catalog, entry, object) {
                Some(id) => {
                    let mut record = Record::new(object, id);
                    fold_attributes(catalog, entry, object, &mut record, |_| true);
                    normalized.records.push(record);
                }
                None => normalized.dropped.push(MalformedRecord {
                    dn: entry.dn.clone(),
                    object,
                    reason: DropReason::MissingId,
                }),
            }
        }
    }
    normalized
}

fn normalize_services(catalog: &Catalog, entries: &[RawEntry]) -> Normalized {
    let mut normalized = Normalized::default();
    let in_view = |d: &AttributeDescriptor| d.service_view;

    let mut services: HashMap<String, usize> = HashMap::new();
    for entry in entries.iter().filter(|e| e.has_object_class(ObjectType::Service)) {
        let Some(id) = entry_id(catalog, entry, ObjectType::Service) else {
            normalized.dropped.push(missing_id(entry, ObjectType::Service));
            continue;
        };
        let mut record = Record::new(ObjectType::Service, id.clone());
        fold_attributes(catalog, entry, ObjectType::Service, &mut record, in_view);
        services.entry(id).or_insert(normalized.records.len());
        normalized.records.push(record);
    }

    let mut endpoints: HashMap<String, usize> = HashMap::new();
    for entry in entries.iter().filter(|e| e.has_object_class(ObjectType::Endpoint)) {
        let Some(id) = entry_id(catalog, entry, ObjectType::Endpoint) else {
            normalized.dropped.push(missing_id(entry, ObjectType::Endpoint));
            continue;
        };
        let link = foreign_key(catalog, entry, ObjectType::Endpoint, "EndpointServiceForeignKey");
        let Some(&owner) = link.as_ref().and_then(|key| services.get(key)) else {
            normalized
                .dropped
                .push(unlinked(entry, ObjectType::Endpoint, ObjectType::Service, link));
            continue;
        };
        let record = &mut normalized.records[owner];
        fold_attributes(catalog, entry, ObjectType::Endpoint, record, in_view);
        endpoints.insert(id, owner);
    }

    for entry in entries
        .iter()
        .filter(|e| e.has_object_class(ObjectType::AccessPolicy))
    {
        if entry_id(catalog, entry, ObjectType::AccessPolicy).is_none() {
            normalized.dropped.push(missing_id(entry, ObjectType::AccessPolicy));
            continue;
        }
        let link = foreign_key(
            catalog,
            entry,
            ObjectType::AccessPolicy,
            "AccessPolicyEndpointForeignKey",
        );
        let Some(&owner) = link.as_ref().and_then(|key| endpoints.get(key)) else {
            normalized.dropped.push(unlinked(
                entry,
                ObjectType::AccessPolicy,
                ObjectType::Endpoint,
                link,
            ));
            continue;
        };
        let record = &mut normalized.records[owner];
        fold_attributes(catalog, entry, ObjectType::AccessPolicy, record, in_view);
    }

    normalized
}

/// The entry's non-empty identifier for `object`.
fn entry_id(catalog: &Catalog, entry: &RawEntry, object: ObjectType) -> Option<String> {
    let descriptor = catalog.id_attribute(object)?;
    entry
        .first(descriptor.raw_name)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn foreign_key(catalog: &Catalog, entry: &RawEntry, object: ObjectType, canonical: &str) -> Option<String> {
    let descriptor = catalog
        .by_object(object)
        .find(|d| d.canonical == canonical)?;
    entry
        .first(descriptor.raw_name)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

fn fold_attributes<F>(catalog: &Catalog, entry: &RawEntry, object: ObjectType, record: &mut Record, keep: F)
where
    F: Fn(&AttributeDescriptor) -> bool,
{
    for (name, values) in entry.attributes() {
        if name.eq_ignore_ascii_case("objectClass") {
            continue;
        }
        match catalog.resolve_raw(object, name) {
            Some(descriptor) if keep(descriptor) => record.append(descriptor, values),
            Some(_) => {}
            None => log::debug!("{} {}: skipping unknown attribute {}", object, record.id(), name),
        }
    }
}

fn missing_id(entry: &RawEntry, object: ObjectType) -> MalformedRecord {
    MalformedRecord {
        dn: entry.dn.clone(),
        object,
        reason: DropReason::MissingId,
    }
}

fn unlinked(entry: &RawEntry, object: ObjectType, target: ObjectType, key: Option<String>) -> MalformedRecord {
    MalformedRecord {
        dn: entry.dn.clone(),
        object,
        reason: DropReason::Unlinked { target, key },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::memory::fixtures;

    fn service<'a>(normalized: &'a Normalized, id: &str) -> &'a Record {
        normalized
            .records
            .iter()
            .find(|r| r.id() == id)
            .unwrap_or_else(|| panic!("no record {}", id))
    }

    #[test]
    fn services_view_joins_endpoints_and_policies() {
        let catalog = Catalog::glue2();
        let normalized = normalize(&catalog, &fixtures::legacy_services(), &View::Services);

        let ids: Vec<_> = normalized.records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["service_1", "service_2", "service_3", "service_4"]);

        let s1 = service(&normalized, "service_1");
        assert_eq!(s1.get("ServiceID").unwrap(), ["service_1"]);
        assert_eq!(s1.get("ServiceType").unwrap(), ["service_type_a"]);
        assert_eq!(
            s1.get("EndpointCapability").unwrap(),
            ["capability_a", "capability_b", "capability_c"]
        );
        assert_eq!(s1.get("EndpointURL").unwrap(), ["ldap://host:2170/XXX"]);
        assert_eq!(s1.get("PolicyRule").unwrap(), ["ALL"]);

        let s2 = service(&normalized, "service_2");
        assert_eq!(s2.get("PolicyRule").unwrap(), ["ALL", "VO:cms"]);
    }

    #[test]
    fn services_view_keeps_every_endpoint_of_a_service() {
        let catalog = Catalog::glue2();
        let normalized = normalize(&catalog, &fixtures::storage_element(), &View::Services);
        assert_eq!(normalized.records.len(), 1);
        assert!(normalized.dropped.is_empty());

        let se = service(&normalized, "se_1");
        assert_eq!(se.get("ServiceType").unwrap(), ["org.dcache.storage"]);
        assert_eq!(
            se.get("EndpointURL").unwrap(),
            ["srm://host:8446/srm", "gsiftp://host:2811"]
        );
        assert_eq!(se.get("EndpointInterfaceName").unwrap(), ["SRM", "GridFTP"]);
        assert_eq!(se.get("EndpointInterfaceVersion").unwrap(), ["2.2.0", "2.0.0"]);
        assert_eq!(se.get("PolicyRule").unwrap(), ["VO:atlas", "VO:cms"]);
    }

    #[test]
    fn services_view_keeps_only_legacy_attributes() {
        let catalog = Catalog::glue2();
        let normalized = normalize(&catalog, &fixtures::legacy_services(), &View::Services);
        let s1 = service(&normalized, "service_1");
        assert!(!s1.contains("ServiceQualityLevel"));
        assert!(!s1.contains("EndpointHealthState"));
        assert!(!s1.contains("EndpointID"));
        assert!(s1.names().all(|name| catalog.resolve(name).unwrap().service_view));
    }

    #[test]
    fn source_order_of_entries_does_not_matter() {
        let catalog = Catalog::glue2();
        let mut entries = fixtures::legacy_services();
        entries.reverse();
        let normalized = normalize(&catalog, &entries, &View::Services);
        let s3 = normalized.records.iter().find(|r| r.id() == "service_3").unwrap();
        assert_eq!(s3.get("EndpointURL").unwrap(), ["ldap://host:2170/ZZZ"]);
        assert_eq!(s3.get("PolicyRule").unwrap(), ["VO:atlas"]);
    }

    #[test]
    fn empty_values_are_kept() {
        let catalog = Catalog::glue2();
        let normalized = normalize(&catalog, &fixtures::legacy_services(), &View::Services);
        let s4 = service(&normalized, "service_4");
        assert_eq!(s4.get("ServiceAdminDomainForeignKey").unwrap(), [""]);
    }

    #[test]
    fn broken_entries_are_dropped_not_fatal() {
        let catalog = Catalog::glue2();
        let normalized = normalize(&catalog, &fixtures::legacy_services(), &View::Services);

        assert!(normalized
            .dropped
            .iter()
            .any(|d| d.object == ObjectType::Endpoint && d.reason == DropReason::MissingId));
        assert!(normalized.dropped.iter().any(|d| d.reason
            == DropReason::Unlinked {
                target: ObjectType::Service,
                key: Some("service_9".into()),
            }));
        assert_eq!(normalized.records.len(), 4);
    }

    #[test]
    fn unknown_raw_attributes_are_skipped() {
        let catalog = Catalog::glue2();
        let entries = vec![RawEntry::new(None)
            .with("objectClass", "GLUE2Service")
            .with("GLUE2ServiceID", "s")
            .with("GLUE2ServiceComplexity", "endpointType=1")];
        let normalized = normalize(
            &catalog,
            &entries,
            &View::Objects(vec![ObjectType::Service]),
        );
        assert_eq!(normalized.records.len(), 1);
        let names: Vec<_> = normalized.records[0].names().collect();
        assert_eq!(names, vec!["ServiceID"]);
    }

    #[test]
    fn objects_view_yields_one_record_per_matching_class() {
        let catalog = Catalog::glue2();
        let normalized = normalize(
            &catalog,
            &fixtures::legacy_services(),
            &View::Objects(vec![ObjectType::Share]),
        );
        let ids: Vec<_> = normalized.records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["computing_share_1", "storage_share_1"]);
        assert!(normalized
            .records
            .iter()
            .all(|r| r.object() == ObjectType::Share));
    }

    #[test]
    fn objects_view_keeps_every_catalogued_attribute() {
        let catalog = Catalog::glue2();
        let normalized = normalize(
            &catalog,
            &fixtures::legacy_services(),
            &View::Objects(vec![ObjectType::Location]),
        );
        assert_eq!(normalized.records.len(), 1);
        let location = &normalized.records[0];
        assert_eq!(location.id(), "location_1");
        assert_eq!(location.get("LocationCountry").unwrap(), ["Switzerland"]);
        assert_eq!(location.get("LocationLatitude").unwrap(), ["46.2"]);
    }

    #[test]
    fn single_valued_attributes_keep_first_value() {
        let catalog = Catalog::glue2();
        let entries = vec![RawEntry::new(None)
            .with("objectClass", "GLUE2Service")
            .with("GLUE2ServiceID", "s")
            .with("GLUE2ServiceType", "first")
            .with("GLUE2ServiceType", "second")];
        let normalized = normalize(
            &catalog,
            &entries,
            &View::Objects(vec![ObjectType::Service]),
        );
        assert_eq!(normalized.records[0].get("ServiceType").unwrap(), ["first"]);
    }

    #[test]
    fn multi_valued_attributes_keep_duplicates_in_order() {
        let catalog = Catalog::glue2();
        let entries = vec![RawEntry::new(None)
            .with("objectClass", "GLUE2Endpoint")
            .with("GLUE2EndpointID", "e")
            .with("GLUE2EndpointCapability", "b")
            .with("GLUE2EndpointCapability", "a")
            .with("GLUE2EndpointCapability", "b")];
        let normalized = normalize(
            &catalog,
            &entries,
            &View::Objects(vec![ObjectType::Endpoint]),
        );
        assert_eq!(
            normalized.records[0].get("EndpointCapability").unwrap(),
            ["b", "a", "b"]
        );
    }

    #[test]
    fn drop_messages_name_the_entry() {
        let dropped = MalformedRecord {
            dn: Some("GLUE2EndpointID=x,o=glue".into()),
            object: ObjectType::Endpoint,
            reason: DropReason::Unlinked {
                target: ObjectType::Service,
                key: Some("service_9".into()),
            },
        };
        assert_eq!(
            dropped.to_string(),
            "Ignoring Endpoint entry GLUE2EndpointID=x,o=glue: references unknown Service service_9"
        );
    }
}
