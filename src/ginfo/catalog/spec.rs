//! Attribute descriptors and the GLUE2 attribute table.
//!
//! This module defines the schema for attributes: what each is called under every
//! naming scheme, which object publishes it, and what its values look like.

use super::kind::ValueKind;
use crate::model::ObjectType;

/// Specification for a single attribute.
///
/// Every attribute has three user-facing names that all resolve to it: the canonical
/// name (`EndpointCapability`), the long alias used as a `--flag` (`cap`) and, for the
/// legacy service attributes, a one-letter short alias (`-t` for `ServiceType`).
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    /// Authoritative name, used in every rendered output except EMI.
    pub canonical: &'static str,

    /// Name of the attribute within its object (`Capability` on an `Endpoint`).
    pub label: &'static str,

    /// GLUE2 LDAP attribute name as published by the directory.
    pub raw_name: &'static str,

    /// Long alias, also the `--flag` used to filter on this attribute.
    pub long_alias: &'static str,

    /// Single-letter alias, also the `-f` short flag.
    pub short_alias: Option<char>,

    /// The object type that publishes this attribute.
    pub object: ObjectType,

    /// Whether the attribute holds a sequence of values rather than a single one.
    pub multi_valued: bool,

    /// What a valid value looks like.
    pub kind: ValueKind,

    /// Whether this attribute identifies its object.
    pub is_id: bool,

    /// Whether the attribute is part of the joined Service view.
    pub service_view: bool,
}

impl AttributeDescriptor {
    const fn new(
        object: ObjectType,
        label: &'static str,
        canonical: &'static str,
        raw_name: &'static str,
        long_alias: &'static str,
    ) -> Self {
        Self {
            canonical,
            label,
            raw_name,
            long_alias,
            short_alias: None,
            object,
            multi_valued: false,
            kind: ValueKind::Any,
            is_id: false,
            service_view: false,
        }
    }

    const fn short(mut self, alias: char) -> Self {
        self.short_alias = Some(alias);
        self
    }

    const fn multi(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    const fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    const fn id(mut self) -> Self {
        self.is_id = true;
        self.kind = ValueKind::Token;
        self
    }

    const fn service_view(mut self) -> Self {
        self.service_view = true;
        self
    }

    /// Whether `value` passes this attribute's validity check.
    pub fn is_valid(&self, value: &str) -> bool {
        self.kind.accepts(value)
    }
}

const QUALITY_LEVELS: &[&str] = &["development", "pre-production", "production", "testing"];
const SERVING_STATES: &[&str] = &["closed", "draining", "production", "queueing"];
const HEALTH_STATES: &[&str] = &["ok", "warning", "critical", "unknown", "other"];
const ACCESS_LATENCIES: &[&str] = &["online", "nearline", "offline"];
const RETENTION_POLICIES: &[&str] = &["custodial", "output", "replica"];
const EXPIRATION_MODES: &[&str] = &["neverexpire", "warnwhenexpired", "releasewhenexpired"];

use ObjectType::*;
use ValueKind::*;

/// Registry of every known attribute, in declaration order.
///
/// This is the single source of truth for attribute naming and validity.
/// Adding an attribute means adding an entry here.
pub const ATTRIBUTES: &[AttributeDescriptor] = &[
    // Service
    AttributeDescriptor::new(Service, "ID", "ServiceID", "GLUE2ServiceID", "id")
        .short('i')
        .id()
        .service_view(),
    AttributeDescriptor::new(Service, "Type", "ServiceType", "GLUE2ServiceType", "type")
        .short('t')
        .kind(Token)
        .service_view(),
    AttributeDescriptor::new(Service, "DomainID", "ServiceAdminDomainForeignKey", "GLUE2ServiceAdminDomainForeignKey", "domain")
        .short('d')
        .kind(Token)
        .service_view(),
    AttributeDescriptor::new(Service, "Capability", "ServiceCapability", "GLUE2ServiceCapability", "service-capability")
        .multi()
        .kind(Token),
    AttributeDescriptor::new(Service, "QualityLevel", "ServiceQualityLevel", "GLUE2ServiceQualityLevel", "service-quality-level")
        .kind(OneOf(QUALITY_LEVELS)),
    AttributeDescriptor::new(Service, "StatusInfo", "ServiceStatusInfo", "GLUE2ServiceStatusInfo", "service-status-info")
        .multi()
        .kind(Url),
    // Endpoint
    AttributeDescriptor::new(Endpoint, "ID", "EndpointID", "GLUE2EndpointID", "endpoint-id").id(),
    AttributeDescriptor::new(Endpoint, "URL", "EndpointURL", "GLUE2EndpointURL", "url")
        .short('u')
        .kind(Url)
        .service_view(),
    AttributeDescriptor::new(Endpoint, "Capability", "EndpointCapability", "GLUE2EndpointCapability", "cap")
        .multi()
        .kind(Token)
        .service_view(),
    AttributeDescriptor::new(Endpoint, "InterfaceName", "EndpointInterfaceName", "GLUE2EndpointInterfaceName", "int")
        .short('n')
        .kind(Token)
        .service_view(),
    AttributeDescriptor::new(Endpoint, "InterfaceVersion", "EndpointInterfaceVersion", "GLUE2EndpointInterfaceVersion", "intv")
        .kind(Version)
        .service_view(),
    AttributeDescriptor::new(Endpoint, "Implementor", "EndpointImplementor", "GLUE2EndpointImplementor", "endpoint-implementor"),
    AttributeDescriptor::new(Endpoint, "ImplementationName", "EndpointImplementationName", "GLUE2EndpointImplementationName", "imp")
        .short('m')
        .kind(Token)
        .service_view(),
    AttributeDescriptor::new(Endpoint, "ImplementationVersion", "EndpointImplementationVersion", "GLUE2EndpointImplementationVersion", "impv")
        .kind(Version)
        .service_view(),
    AttributeDescriptor::new(Endpoint, "QualityLevel", "EndpointQualityLevel", "GLUE2EndpointQualityLevel", "ql")
        .short('q')
        .kind(OneOf(QUALITY_LEVELS))
        .service_view(),
    AttributeDescriptor::new(Endpoint, "HealthState", "EndpointHealthState", "GLUE2EndpointHealthState", "endpoint-health-state")
        .kind(OneOf(HEALTH_STATES)),
    AttributeDescriptor::new(Endpoint, "ServingState", "EndpointServingState", "GLUE2EndpointServingState", "endpoint-serving-state")
        .kind(OneOf(SERVING_STATES)),
    AttributeDescriptor::new(Endpoint, "ServiceID", "EndpointServiceForeignKey", "GLUE2EndpointServiceForeignKey", "endpoint-service-id")
        .kind(Token),
    // AccessPolicy
    AttributeDescriptor::new(AccessPolicy, "ID", "AccessPolicyID", "GLUE2PolicyID", "access-policy-id").id(),
    AttributeDescriptor::new(AccessPolicy, "Name", "AccessPolicyName", "GLUE2EntityName", "access-policy-name"),
    AttributeDescriptor::new(AccessPolicy, "Scheme", "AccessPolicyScheme", "GLUE2PolicyScheme", "access-policy-scheme")
        .kind(Token),
    AttributeDescriptor::new(AccessPolicy, "Rule", "PolicyRule", "GLUE2PolicyRule", "vo")
        .multi()
        .kind(PolicyRule)
        .service_view(),
    AttributeDescriptor::new(AccessPolicy, "EndpointID", "AccessPolicyEndpointForeignKey", "GLUE2AccessPolicyEndpointForeignKey", "access-policy-endpoint-id")
        .kind(Token),
    // AdminDomain
    AttributeDescriptor::new(AdminDomain, "ID", "AdminDomainID", "GLUE2DomainID", "admin-domain-id").id(),
    AttributeDescriptor::new(AdminDomain, "Description", "AdminDomainDescription", "GLUE2DomainDescription", "admin-domain-description"),
    // ComputingManager
    AttributeDescriptor::new(ComputingManager, "ID", "ComputingManagerID", "GLUE2ManagerID", "computing-manager-id").id(),
    AttributeDescriptor::new(ComputingManager, "ProductName", "ComputingManagerProductName", "GLUE2ManagerProductName", "computing-manager-product-name")
        .kind(Token),
    AttributeDescriptor::new(ComputingManager, "ProductVersion", "ComputingManagerProductVersion", "GLUE2ManagerProductVersion", "computing-manager-product-version")
        .kind(Version),
    AttributeDescriptor::new(ComputingManager, "ServiceID", "ComputingManagerServiceForeignKey", "GLUE2ManagerServiceForeignKey", "computing-manager-service-id")
        .kind(Token),
    // ComputingShare
    AttributeDescriptor::new(ComputingShare, "ID", "ComputingShareID", "GLUE2ShareID", "computing-share-id").id(),
    AttributeDescriptor::new(ComputingShare, "MaxCPUTime", "ComputingShareMaxCPUTime", "GLUE2ComputingShareMaxCPUTime", "computing-share-max-cpu-time")
        .kind(Integer),
    AttributeDescriptor::new(ComputingShare, "MaxWallTime", "ComputingShareMaxWallTime", "GLUE2ComputingShareMaxWallTime", "computing-share-max-wall-time")
        .kind(Integer),
    AttributeDescriptor::new(ComputingShare, "ServingState", "ComputingShareServingState", "GLUE2ComputingShareServingState", "computing-share-serving-state")
        .kind(OneOf(SERVING_STATES)),
    AttributeDescriptor::new(ComputingShare, "RunningJobs", "ComputingShareRunningJobs", "GLUE2ComputingShareRunningJobs", "computing-share-running-jobs")
        .kind(Integer),
    AttributeDescriptor::new(ComputingShare, "WaitingJobs", "ComputingShareWaitingJobs", "GLUE2ComputingShareWaitingJobs", "computing-share-waiting-jobs")
        .kind(Integer),
    AttributeDescriptor::new(ComputingShare, "ExecutionEnvironmentID", "ComputingShareExecutionEnvironmentForeignKey", "GLUE2ComputingShareExecutionEnvironmentForeignKey", "computing-share-execution-environment-id")
        .multi()
        .kind(Token),
    AttributeDescriptor::new(ComputingShare, "EndpointID", "ComputingShareComputingEndpointForeignKey", "GLUE2ComputingShareComputingEndpointForeignKey", "computing-share-endpoint-id")
        .multi()
        .kind(Token),
    AttributeDescriptor::new(ComputingShare, "Other", "ComputingShareOtherInfo", "GLUE2EntityOtherInfo", "computing-share-other-info")
        .multi(),
    // ExecutionEnvironment
    AttributeDescriptor::new(ExecutionEnvironment, "ID", "ExecutionEnvironmentID", "GLUE2ResourceID", "execution-environment-id").id(),
    AttributeDescriptor::new(ExecutionEnvironment, "OSName", "ExecutionEnvironmentOSName", "GLUE2ExecutionEnvironmentOSName", "execution-environment-os-name")
        .kind(Token),
    AttributeDescriptor::new(ExecutionEnvironment, "ConnectivityOut", "ExecutionEnvironmentConnectivityOut", "GLUE2ExecutionEnvironmentConnectivityOut", "execution-environment-connectivity-out")
        .kind(Boolean),
    AttributeDescriptor::new(ExecutionEnvironment, "MainMemorySize", "ExecutionEnvironmentMainMemorySize", "GLUE2ExecutionEnvironmentMainMemorySize", "execution-environment-main-memory-size")
        .kind(Integer),
    AttributeDescriptor::new(ExecutionEnvironment, "VirtualMemorySize", "ExecutionEnvironmentVirtualMemorySize", "GLUE2ExecutionEnvironmentVirtualMemorySize", "execution-environment-virtual-memory-size")
        .kind(Integer),
    // Location
    AttributeDescriptor::new(Location, "ID", "LocationID", "GLUE2LocationID", "location-id").id(),
    AttributeDescriptor::new(Location, "Country", "LocationCountry", "GLUE2LocationCountry", "location-country"),
    AttributeDescriptor::new(Location, "Latitude", "LocationLatitude", "GLUE2LocationLatitude", "location-latitude")
        .kind(Decimal { min: -90.0, max: 90.0 }),
    AttributeDescriptor::new(Location, "Longitude", "LocationLongitude", "GLUE2LocationLongitude", "location-longitude")
        .kind(Decimal { min: -180.0, max: 180.0 }),
    // MappingPolicy
    AttributeDescriptor::new(MappingPolicy, "ID", "MappingPolicyID", "GLUE2PolicyID", "mapping-policy-id").id(),
    AttributeDescriptor::new(MappingPolicy, "Scheme", "MappingPolicyScheme", "GLUE2PolicyScheme", "mapping-policy-scheme")
        .kind(Token),
    AttributeDescriptor::new(MappingPolicy, "Rule", "MappingPolicyRule", "GLUE2PolicyRule", "mapping-policy-rule")
        .multi()
        .kind(PolicyRule),
    AttributeDescriptor::new(MappingPolicy, "ShareID", "MappingPolicyShareForeignKey", "GLUE2MappingPolicyShareForeignKey", "mapping-policy-share-id")
        .kind(Token),
    // Share
    AttributeDescriptor::new(Share, "ID", "ShareID", "GLUE2ShareID", "share-id").id(),
    AttributeDescriptor::new(Share, "ServiceID", "ShareServiceForeignKey", "GLUE2ShareServiceForeignKey", "share-service-id")
        .kind(Token),
    // StorageShare
    AttributeDescriptor::new(StorageShare, "ID", "StorageShareID", "GLUE2ShareID", "storage-share-id").id(),
    AttributeDescriptor::new(StorageShare, "SharingID", "StorageShareSharingID", "GLUE2StorageShareSharingID", "storage-share-sharing-id")
        .kind(Token),
    AttributeDescriptor::new(StorageShare, "Path", "StorageSharePath", "GLUE2StorageSharePath", "storage-share-path"),
    AttributeDescriptor::new(StorageShare, "AccessMode", "StorageShareAccessMode", "GLUE2StorageShareAccessMode", "storage-share-access-mode")
        .multi()
        .kind(Token),
    AttributeDescriptor::new(StorageShare, "AccessLatency", "StorageShareAccessLatency", "GLUE2StorageShareAccessLatency", "storage-share-access-latency")
        .kind(OneOf(ACCESS_LATENCIES)),
    AttributeDescriptor::new(StorageShare, "ServingState", "StorageShareServingState", "GLUE2StorageShareServingState", "storage-share-serving-state")
        .kind(OneOf(SERVING_STATES)),
    AttributeDescriptor::new(StorageShare, "RetentionPolicy", "StorageShareRetentionPolicy", "GLUE2StorageShareRetentionPolicy", "storage-share-retention-policy")
        .kind(OneOf(RETENTION_POLICIES)),
    AttributeDescriptor::new(StorageShare, "ExpirationMode", "StorageShareExpirationMode", "GLUE2StorageShareExpirationMode", "storage-share-expiration-mode")
        .multi()
        .kind(OneOf(EXPIRATION_MODES)),
    AttributeDescriptor::new(StorageShare, "DefaultLifeTime", "StorageShareDefaultLifeTime", "GLUE2StorageShareDefaultLifeTime", "storage-share-default-lifetime")
        .kind(Integer),
    AttributeDescriptor::new(StorageShare, "MaximumLifeTime", "StorageShareMaximumLifeTime", "GLUE2StorageShareMaximumLifeTime", "storage-share-maximum-lifetime")
        .kind(Integer),
    AttributeDescriptor::new(StorageShare, "Tag", "StorageShareTag", "GLUE2StorageShareTag", "storage-share-tag")
        .kind(Token),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_object_type_has_exactly_one_id() {
        for object in ObjectType::ALL {
            let ids = ATTRIBUTES
                .iter()
                .filter(|d| d.object == object && d.is_id)
                .count();
            assert_eq!(ids, 1, "{} should declare one id attribute", object);
        }
    }

    #[test]
    fn short_aliases_avoid_option_letters() {
        // -H -b -l -j -c -e -v -V -h belong to the command line itself
        let reserved: HashSet<char> = "HbljcevVh".chars().collect();
        for descriptor in ATTRIBUTES {
            if let Some(alias) = descriptor.short_alias {
                assert!(!reserved.contains(&alias), "{} uses -{}", descriptor.canonical, alias);
            }
        }
    }

    #[test]
    fn labels_are_unique_within_an_object() {
        let mut seen = HashSet::new();
        for descriptor in ATTRIBUTES {
            assert!(
                seen.insert((descriptor.object, descriptor.label)),
                "duplicate label {} on {}",
                descriptor.label,
                descriptor.object
            );
        }
    }

    #[test]
    fn service_view_is_the_legacy_attribute_set() {
        let names: Vec<_> = ATTRIBUTES
            .iter()
            .filter(|d| d.service_view)
            .map(|d| d.long_alias)
            .collect();
        assert_eq!(
            names,
            vec!["id", "type", "domain", "url", "cap", "int", "intv", "imp", "impv", "ql", "vo"]
        );
    }

    #[test]
    fn capability_spec_is_correct() {
        let cap = ATTRIBUTES
            .iter()
            .find(|d| d.canonical == "EndpointCapability")
            .unwrap();
        assert_eq!(cap.object, Endpoint);
        assert_eq!(cap.long_alias, "cap");
        assert!(cap.short_alias.is_none());
        assert!(cap.multi_valued);
        assert!(cap.is_valid("capability_a"));
        assert!(!cap.is_valid("capability d"));
    }
}
