//! Reading ISC dhcpd lease logs.
//!
//! A lease log is append-only: every renewal writes a fresh `lease <ip> { ... }`
//! block, so the same host shows up many times with different end times. This
//! crate parses those blocks into [`Lease`] values and keeps them in a
//! [`LeaseStore`] ordered freshest first, which is what callers deriving
//! long-lived names from the log want to look at.
//!
//! ```ignore
//! use chrono::Utc;
//! use dhcpd_leases::LeaseStore;
//!
//! let store = LeaseStore::load("/var/lib/dhcpd/dhcpd.leases".as_ref(), Utc::now())?;
//! for lease in store.unique_by_identity() {
//!     println!("{} {:?}", lease.ip, lease.host_name);
//! }
//! ```

pub mod lease;
pub mod parser;
pub mod store;

pub use lease::{sanitize_host_name, Lease};
pub use parser::{lease_lines, parse, parse_lines, LeaseError, NEVER_ENDS_HORIZON_SECS};
pub use store::{LeaseNotFound, LeaseStore, UniqueLeases};
