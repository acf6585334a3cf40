//! Publish DHCP-leased hosts as tinydns alias records.
//!
//! Hosts that get their address from ISC dhcpd usually have no DNS name. This
//! library turns a snapshot of the dhcpd lease log into `=` alias lines for the
//! djbdns `tinydns` data file, so every leased host resolves under the domain
//! of the subnet it lives in.
//!
//! # Pipeline
//!
//! 1. **Parse** the lease log into a freshest-first store ([`dhcpd_leases`])
//! 2. **Resolve** each address to a domain ([`domain_map`])
//! 3. **Bound** the record TTL by the time left on the lease ([`ttl`])
//! 4. **Assemble** alias records grouped by domain ([`records`])
//! 5. **Lay out** static fragments plus generated sections ([`zone_data`])
//! 6. **Merge** the result into the tinydns root ([`merge`])
//!
//! ## Inputs
//!
//! - [`input_files`] — subnet map, MAC override file and static fragments
//! - [`settings`] — optional TOML file with defaults for the command line
//!
//! ## Output
//!
//! - [`tinydns`] — data-line model for the tinydns `data` file
//! - [`lease_report`] — lease listings for inspection
//! - [`summary`] — one-line run summary
//!
//! # Examples
//!
//! ```ignore
//! use chrono::Utc;
//! use dhcp2tinydns::domain_map::DomainMapBuilder;
//! use dhcp2tinydns::records::assemble;
//! use dhcpd_leases::LeaseStore;
//!
//! let now = Utc::now();
//! let store = LeaseStore::load("dhcpd.leases".as_ref(), now)?;
//! let mut domains = DomainMapBuilder::default();
//! domains.set_default("example.com");
//! let assembly = assemble(&store, &domains.build(), &[], now)?;
//! for group in assembly.records.groups() {
//!     println!("{}: {} records", group.domain, group.records.len());
//! }
//! ```

pub mod domain_map;
pub mod input_files;
pub mod lease_report;
pub mod merge;
pub mod records;
pub mod settings;
pub mod summary;
pub mod tinydns;
pub mod ttl;
pub mod zone_data;
