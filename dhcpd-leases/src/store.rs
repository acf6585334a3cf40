use std::collections::HashSet;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use std::slice;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::lease::Lease;
use crate::parser::{parse, LeaseError};

/// No lease carries the requested hardware address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hardware address {0} not found in leases")]
pub struct LeaseNotFound(pub String);

/// Every lease from one snapshot of a lease log, freshest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaseStore {
    leases: Vec<Lease>,
}

impl LeaseStore {
    /// Read and parse a lease file.
    ///
    /// Invalid UTF-8 (dhcpd writes raw client bytes in some fields) is
    /// replaced rather than rejected.
    pub fn load(path: &Path, now: DateTime<Utc>) -> Result<Self, LeaseError> {
        let bytes = fs::read(path)?;
        Self::parse(&String::from_utf8_lossy(&bytes), now)
    }

    /// Parse lease log text into a store.
    pub fn parse(text: &str, now: DateTime<Utc>) -> Result<Self, LeaseError> {
        Ok(Self::from_leases(parse(text, now)?))
    }

    /// Build a store from leases in parse order.
    ///
    /// Leases are ordered by expiration, latest first. Leases without an
    /// expiration go last and ties keep their parse order.
    pub fn from_leases(mut leases: Vec<Lease>) -> Self {
        leases.sort_by(|a, b| b.cmp_expiration(a));
        Self { leases }
    }

    /// Return the most recently expiring lease for a hardware address.
    pub fn lookup(&self, hardware_address: &str) -> Result<&Lease, LeaseNotFound> {
        self.leases
            .iter()
            .find(|lease| lease.hardware_address.as_deref() == Some(hardware_address))
            .ok_or_else(|| LeaseNotFound(hardware_address.to_string()))
    }

    pub fn contains(&self, hardware_address: &str) -> bool {
        self.lookup(hardware_address).is_ok()
    }

    pub fn iter(&self) -> slice::Iter<'_, Lease> {
        self.leases.iter()
    }

    pub fn len(&self) -> usize {
        self.leases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leases.is_empty()
    }

    /// Iterate leases in store order, skipping any whose `(host name, address)`
    /// pair was already yielded.
    ///
    /// Each call starts a fresh pass.
    pub fn unique_by_identity(&self) -> UniqueLeases<'_> {
        UniqueLeases {
            inner: self.leases.iter(),
            reported: HashSet::new(),
        }
    }
}

impl<'a> IntoIterator for &'a LeaseStore {
    type Item = &'a Lease;
    type IntoIter = slice::Iter<'a, Lease>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`LeaseStore::unique_by_identity`].
#[derive(Debug, Clone)]
pub struct UniqueLeases<'a> {
    inner: slice::Iter<'a, Lease>,
    reported: HashSet<(Option<&'a str>, Ipv4Addr)>,
}

impl<'a> Iterator for UniqueLeases<'a> {
    type Item = &'a Lease;

    fn next(&mut self) -> Option<Self::Item> {
        for lease in self.inner.by_ref() {
            if self.reported.insert(lease.identity()) {
                return Some(lease);
            }
        }
        None
    }
}
