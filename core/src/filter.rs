//! Query filters and pagination options.
//!
//! [`Filters`] holds the optional predicates shared by every listing and
//! aggregate operation; absent fields impose no constraint and present
//! fields combine with logical AND. [`QueryOptions`] carries pagination —
//! a `limit` of 0 means unbounded, and ordering is always stable so that
//! offset/limit slices are reproducible against an unchanged store.

use serde::{Deserialize, Serialize};

/// Optional predicates applied to listing and aggregate queries.
///
/// # Examples
///
/// ```
/// use vm_inventory_core::Filters;
///
/// let filters = Filters::default().with_cluster("Prod").with_os("Windows");
/// assert_eq!(filters.cluster.as_deref(), Some("Prod"));
/// assert!(filters.power_state.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    /// Exact cluster-name match.
    pub cluster: Option<String>,
    /// Substring match against the guest-OS field.
    pub os: Option<String>,
    /// Exact power-state match (e.g. `"poweredOn"`).
    pub power_state: Option<String>,
}

impl Filters {
    /// Returns true when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.cluster.is_none() && self.os.is_none() && self.power_state.is_none()
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = Some(os.into());
        self
    }

    pub fn with_power_state(mut self, state: impl Into<String>) -> Self {
        self.power_state = Some(state.into());
        self
    }
}

/// Pagination options for listing queries.
///
/// A `limit` of 0 means unbounded (no LIMIT clause is emitted, rather
/// than `LIMIT 0`). `offset` rows are skipped from the start of the
/// stably ordered result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    pub limit: u64,
    pub offset: u64,
}

impl QueryOptions {
    /// Convenience constructor for a limit/offset pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use vm_inventory_core::QueryOptions;
    ///
    /// let page = QueryOptions::page(50, 100);
    /// assert_eq!(page.limit, 50);
    /// assert_eq!(page.offset, 100);
    /// ```
    pub fn page(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_are_empty() {
        assert!(Filters::default().is_empty());
        assert!(!Filters::default().with_power_state("poweredOff").is_empty());
    }
}
