//! Field names of the legacy EMI registry format.
//!
//! These names are only used by the EMI renderer and are kept apart from the catalog
//! so canonical names can evolve independently.

const EMI_NAMES: &[(&str, &str)] = &[
    ("ServiceID", "Service_Id"),
    ("ServiceType", "Service_Type"),
    ("ServiceAdminDomainForeignKey", "Service_Admin_Domain"),
    ("EndpointURL", "Service_Endpoint_URL"),
    ("EndpointCapability", "Endpoint_Capability"),
    ("EndpointInterfaceName", "Endpoint_Interface_Name"),
    ("EndpointInterfaceVersion", "Endpoint_Interface_Version"),
    ("EndpointImplementationName", "Endpoint_Implementation_Name"),
    ("EndpointImplementationVersion", "Endpoint_Implementation_Version"),
    ("EndpointQualityLevel", "Endpoint_Quality_Level"),
];

/// The EMI field for a canonical attribute, if the format has one.
pub fn emi_name(canonical: &str) -> Option<&'static str> {
    EMI_NAMES
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, emi)| *emi)
}
