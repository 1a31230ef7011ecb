//! Validated host-list newtype.

use crate::error::ConfigError;

/// An ordered, non-empty list of base URLs for one API surface.
///
/// The backend is deployed across several regions; each API surface (catalog,
/// payments, media, ...) publishes an ordered list of base URLs. Dispatch
/// starts at the preferred entry and fails over circularly when a host is
/// unreachable, so the order in this list is meaningful: put the closest or
/// most reliable region first.
///
/// Construction validates that the list is non-empty and that no entry is
/// blank. Whether an entry parses as a URL is checked when a request is built
/// against it, so a typo in one region's URL does not prevent the others from
/// serving traffic.
///
/// # Example
///
/// ```rust
/// use commerce_api::HostList;
///
/// let hosts = HostList::new([
///     "https://api-eu.example.com",
///     "https://api-us.example.com",
/// ]).unwrap();
///
/// assert_eq!(hosts.len(), 2);
/// assert_eq!(hosts.get(0), "https://api-eu.example.com");
/// // Indexing is circular: the entry after the last is the first.
/// assert_eq!(hosts.get(2), "https://api-eu.example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostList {
    hosts: Vec<String>,
}

impl HostList {
    /// Creates a validated host list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyHostList`] if `hosts` yields no entries,
    /// or [`ConfigError::BlankHost`] if any entry is empty or whitespace.
    pub fn new<I, S>(hosts: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let hosts: Vec<String> = hosts.into_iter().map(Into::into).collect();
        if hosts.is_empty() {
            return Err(ConfigError::EmptyHostList);
        }
        if let Some(index) = hosts.iter().position(|host| host.trim().is_empty()) {
            return Err(ConfigError::BlankHost { index });
        }
        Ok(Self { hosts })
    }

    /// Creates a single-host list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BlankHost`] if `host` is empty or whitespace.
    pub fn single(host: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new([host.into()])
    }

    /// Returns the number of hosts. Always at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Always `false`: construction rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Returns the base URL at `index`, wrapping around past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> &str {
        &self.hosts[index % self.hosts.len()]
    }

    /// Returns the index that follows `index`, wrapping around past the end.
    #[must_use]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.hosts.len()
    }

    /// Returns the hosts in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.hosts
    }
}

// Verify HostList is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HostList>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_list() {
        let result = HostList::new(Vec::<String>::new());
        assert!(matches!(result, Err(ConfigError::EmptyHostList)));
    }

    #[test]
    fn test_rejects_blank_entry() {
        let result = HostList::new(["https://api.example.com", "  "]);
        assert!(matches!(result, Err(ConfigError::BlankHost { index: 1 })));
    }

    #[test]
    fn test_single_host() {
        let hosts = HostList::single("https://api.example.com").unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts.get(0), "https://api.example.com");
    }

    #[test]
    fn test_validated_list_is_never_empty() {
        let single = HostList::single("https://api.example.com").unwrap();
        let multi = HostList::new(["a://one", "a://two"]).unwrap();
        assert!(!single.is_empty());
        assert!(!multi.is_empty());
    }

    #[test]
    fn test_get_wraps_around() {
        let hosts = HostList::new(["a://one", "a://two", "a://three"]).unwrap();
        assert_eq!(hosts.get(3), "a://one");
        assert_eq!(hosts.get(4), "a://two");
    }

    #[test]
    fn test_next_index_is_circular() {
        let hosts = HostList::new(["a://one", "a://two", "a://three"]).unwrap();
        assert_eq!(hosts.next_index(0), 1);
        assert_eq!(hosts.next_index(2), 0);
    }

    #[test]
    fn test_preserves_order() {
        let hosts = HostList::new(["a://one", "a://two"]).unwrap();
        assert_eq!(hosts.as_slice(), &["a://one", "a://two"]);
    }
}
