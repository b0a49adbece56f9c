//! Composite cache keys
//!
//! A key addresses one cached snapshot: resource name + query variant +
//! whatever parameters shaped the request (filters, page, search text).
//! Two reads that differ in any parameter address independent entries.

use std::collections::BTreeMap;
use std::fmt;

/// Composite identifier for one cached snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    resource: String,
    variant: String,
    params: BTreeMap<String, String>,
}

impl QueryKey {
    /// Key for a resource's collection listing
    pub fn list(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            variant: "list".to_string(),
            params: BTreeMap::new(),
        }
    }

    /// Key for a named query variant other than the plain listing
    pub fn view(resource: &str, variant: &str) -> Self {
        Self {
            resource: resource.to_string(),
            variant: variant.to_string(),
            params: BTreeMap::new(),
        }
    }

    /// Key for a single record
    pub fn detail(resource: &str, id: impl fmt::Display) -> Self {
        let mut params = BTreeMap::new();
        params.insert("id".to_string(), id.to_string());
        Self {
            resource: resource.to_string(),
            variant: "detail".to_string(),
            params,
        }
    }

    /// Add a request parameter to the key
    pub fn with_param(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    /// The resource this key belongs to
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.variant)?;
        for (name, value) in &self.params {
            write!(f, ".{}={}", name, value)?;
        }
        Ok(())
    }
}
