//! # Directory Layer
//!
//! The [`Directory`] trait is the single seam between ginfo and the information
//! system it queries. The engine never talks to a directory itself: the API facade
//! fetches entries once per invocation and hands them over.
//!
//! ## Implementations
//!
//! - [`ldif::LdifDirectory`]: reads an LDIF snapshot of the information system, the
//!   same text `ldapsearch -LLL -x -H ldap://host:2170 -b o=glue` prints. Reading
//!   happens on a worker thread so the fetch timeout is honoured.
//!
//! - [`memory::InMemoryDirectory`]: holds entries in memory, for tests.
//!
//! Both apply the same selection rules ([`FetchRequest::selects`]), so a fetch returns
//! only entries under the bind DN that carry one of the requested object classes.

use crate::error::Result;
use crate::model::{ObjectType, RawEntry};
use std::time::Duration;

pub mod ldif;
pub mod memory;

pub const DEFAULT_BIND: &str = "o=glue";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PORT: u16 = 2170;

/// What to fetch, and from where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// `host:port` of the information system, used in messages and errors.
    pub host: String,
    /// Base DN the search is rooted at.
    pub bind: String,
    pub objects: Vec<ObjectType>,
    pub timeout: Duration,
}

impl FetchRequest {
    pub fn new(host: impl Into<String>, objects: Vec<ObjectType>) -> Self {
        Self {
            host: host.into(),
            bind: DEFAULT_BIND.to_string(),
            objects,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether `entry` answers this request.
    ///
    /// Entries without a DN are accepted on the object class alone.
    pub fn selects(&self, entry: &RawEntry) -> bool {
        let in_bind = match &entry.dn {
            Some(dn) => ends_with_ignore_case(dn, &self.bind),
            None => true,
        };
        in_bind
            && self
                .objects
                .iter()
                .any(|object| entry.has_object_class(*object))
    }
}

fn ends_with_ignore_case(dn: &str, suffix: &str) -> bool {
    let dn = dn.trim().to_ascii_lowercase();
    let suffix = suffix.trim().to_ascii_lowercase();
    if suffix.is_empty() || dn == suffix {
        return true;
    }
    dn.ends_with(&format!(",{}", suffix))
}

/// A source of directory entries.
pub trait Directory {
    /// Returns every entry selected by `request`, in source order.
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawEntry>>;
}

/// Normalizes a user-supplied host to `host:port`.
///
/// Only the first of a comma-separated list is used, and the default port is added
/// when missing.
pub fn normalize_host(raw: &str) -> Option<String> {
    let host = raw.split(',').next()?.trim();
    if host.is_empty() {
        return None;
    }
    if host.contains(':') {
        Some(host.to_string())
    } else {
        Some(format!("{}:{}", host, DEFAULT_PORT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dn: &str, class: &str) -> RawEntry {
        RawEntry::new(Some(dn.to_string())).with("objectClass", class)
    }

    #[test]
    fn selects_by_object_class() {
        let request = FetchRequest::new("h:2170", vec![ObjectType::Service]);
        assert!(request.selects(&entry("GLUE2ServiceID=s,o=glue", "GLUE2Service")));
        assert!(!request.selects(&entry("GLUE2EndpointID=e,o=glue", "GLUE2Endpoint")));
    }

    #[test]
    fn selects_by_bind_suffix() {
        let request = FetchRequest::new("h:2170", vec![ObjectType::Service]);
        assert!(request.selects(&entry("GLUE2ServiceID=s,O=GLUE", "GLUE2Service")));
        assert!(!request.selects(&entry("GLUE2ServiceID=s,o=infosys", "GLUE2Service")));
        assert!(!request.selects(&entry("GLUE2ServiceID=s,o=glue2", "GLUE2Service")));

        let other = request.with_bind("o=infosys");
        assert!(other.selects(&entry("GLUE2ServiceID=s,o=infosys", "GLUE2Service")));
    }

    #[test]
    fn entries_without_dn_are_kept() {
        let request = FetchRequest::new("h:2170", vec![ObjectType::Service]);
        let entry = RawEntry::new(None).with("objectClass", "GLUE2Service");
        assert!(request.selects(&entry));
    }

    #[test]
    fn host_normalization() {
        assert_eq!(normalize_host("bdii.example.org"), Some("bdii.example.org:2170".into()));
        assert_eq!(normalize_host("bdii:2180,other:2170"), Some("bdii:2180".into()));
        assert_eq!(normalize_host(" first , second"), Some("first:2170".into()));
        assert_eq!(normalize_host(""), None);
    }
}
