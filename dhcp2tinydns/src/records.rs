//! Alias record assembly.
//!
//! Named overrides from the MAC file are placed first, then every unique lease
//! that carries its own host name. A host name claimed by an override is never
//! emitted again from a lease, even when the override's MAC has no lease.
//! Lease host names that are not ASCII cannot be DNS labels and are skipped.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use dhcpd_leases::{Lease, LeaseStore};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::domain_map::DomainMap;
use crate::ttl::lease_ttl;

/// A generated name-to-address record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasRecord {
    pub fqdn: String,
    pub ip: Ipv4Addr,
    pub ttl: u32,
}

/// Records owned by one domain, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainRecords {
    pub domain: String,
    pub records: Vec<AliasRecord>,
}

/// Records grouped by domain, domains in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZoneRecords {
    groups: Vec<DomainRecords>,
}

impl ZoneRecords {
    pub fn push(&mut self, domain: &str, record: AliasRecord) {
        match self.groups.iter_mut().find(|g| g.domain == domain) {
            Some(group) => group.records.push(record),
            None => self.groups.push(DomainRecords {
                domain: domain.to_string(),
                records: vec![record],
            }),
        }
    }

    pub fn groups(&self) -> &[DomainRecords] {
        &self.groups
    }

    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A fixed host name for a hardware address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacOverride {
    pub hardware_address: String,
    pub host_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("no domain configured for {ip} (host {host_name}); add a subnet map entry or --domain")]
    NoDomain { ip: Ipv4Addr, host_name: String },
}

/// Result of [`assemble`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assembly {
    pub records: ZoneRecords,
    /// Override host names whose hardware address has no lease.
    pub unassigned: Vec<String>,
}

/// Build the alias record for `lease` published as `host_name`.
///
/// Returns the owning domain alongside the record.
pub fn alias_record(
    lease: &Lease,
    host_name: &str,
    domains: &DomainMap,
    now: DateTime<Utc>,
) -> Result<(String, AliasRecord), AssembleError> {
    let domain = domains
        .resolve(lease.ip)
        .ok_or_else(|| AssembleError::NoDomain {
            ip: lease.ip,
            host_name: host_name.to_string(),
        })?;

    let record = AliasRecord {
        fqdn: format!("{host_name}.{domain}"),
        ip: lease.ip,
        ttl: lease_ttl(lease, now),
    };
    Ok((domain.to_string(), record))
}

/// Turn a lease store into alias records grouped by domain.
pub fn assemble(
    store: &LeaseStore,
    domains: &DomainMap,
    overrides: &[MacOverride],
    now: DateTime<Utc>,
) -> Result<Assembly, AssembleError> {
    let mut assembly = Assembly::default();
    let mut claimed: HashSet<&str> = HashSet::new();

    for entry in overrides {
        claimed.insert(entry.host_name.as_str());
        match store.lookup(&entry.hardware_address) {
            Ok(lease) => {
                let (domain, record) = alias_record(lease, &entry.host_name, domains, now)?;
                assembly.records.push(&domain, record);
            }
            Err(err) => {
                debug!(host = %entry.host_name, "{err}; reserving name without a record");
                assembly.unassigned.push(entry.host_name.clone());
            }
        }
    }

    for lease in store.unique_by_identity() {
        let Some(host_name) = lease.host_name.as_deref() else {
            continue;
        };
        if claimed.contains(host_name) {
            debug!(host = host_name, ip = %lease.ip, "host name claimed by MAC override");
            continue;
        }
        if !host_name.is_ascii() {
            debug!(host = host_name, ip = %lease.ip, "skipping non-ASCII host name");
            continue;
        }
        let (domain, record) = alias_record(lease, host_name, domains, now)?;
        assembly.records.push(&domain, record);
    }

    Ok(assembly)
}
