//! Subnet to domain resolution.
//!
//! Networks are scanned in ascending order of `network address + address
//! count`, i.e. the address one past the end of each range. A subnet nested
//! inside a larger one therefore never sorts after it, except when both end on
//! the same address: the key ties and the order they were configured in
//! decides. The scan returns the first network containing the address, so the
//! narrower entry usually wins without a full longest-prefix match.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use serde::Serialize;

/// Remove surrounding whitespace and leading dots from a configured domain.
pub fn dedot(domain: &str) -> &str {
    domain.trim().trim_start_matches('.')
}

/// The `0.0.0.0/0` network that carries the default domain.
pub fn catch_all_network() -> Ipv4Net {
    Ipv4Net::default()
}

/// Ordering key for a network: its base address plus its address count.
pub fn sort_key(network: &Ipv4Net) -> u64 {
    let base = u64::from(u32::from(network.network()));
    base + (1u64 << (32 - u32::from(network.prefix_len())))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainEntry {
    pub network: Ipv4Net,
    pub domain: String,
}

/// Collects network to domain pairs before they are ordered for lookup.
///
/// Inserting a network twice replaces its domain but keeps its original
/// position.
#[derive(Debug, Clone, Default)]
pub struct DomainMapBuilder {
    entries: Vec<DomainEntry>,
}

impl DomainMapBuilder {
    /// Map `network` to `domain`, returning the domain it replaced.
    pub fn insert(&mut self, network: Ipv4Net, domain: impl Into<String>) -> Option<String> {
        let domain = domain.into();
        match self.entries.iter_mut().find(|e| e.network == network) {
            Some(entry) => Some(std::mem::replace(&mut entry.domain, domain)),
            None => {
                self.entries.push(DomainEntry { network, domain });
                None
            }
        }
    }

    pub fn get(&self, network: &Ipv4Net) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| &e.network == network)
            .map(|e| e.domain.as_str())
    }

    /// Point the catch-all network at `domain`.
    ///
    /// Returns the previous catch-all domain when it was a different one.
    pub fn set_default(&mut self, domain: &str) -> Option<String> {
        self.insert(catch_all_network(), domain)
            .filter(|previous| previous != domain)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> DomainMap {
        DomainMap::build(self.entries.into_iter().map(|e| (e.network, e.domain)))
    }
}

/// Networks ordered for first-match domain lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainMap {
    entries: Vec<DomainEntry>,
}

impl DomainMap {
    /// Order `(network, domain)` pairs by [`sort_key`]. Ties keep input order.
    pub fn build<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Ipv4Net, S)>,
        S: Into<String>,
    {
        let mut entries: Vec<DomainEntry> = entries
            .into_iter()
            .map(|(network, domain)| DomainEntry {
                network: network.trunc(),
                domain: domain.into(),
            })
            .collect();
        entries.sort_by_key(|e| sort_key(&e.network));
        Self { entries }
    }

    /// Domain of the first network in lookup order that contains `ip`.
    pub fn resolve(&self, ip: Ipv4Addr) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.network.contains(&ip))
            .map(|e| e.domain.as_str())
    }

    pub fn entries(&self) -> &[DomainEntry] {
        &self.entries
    }
}
