use std::cmp::Ordering;
use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One completed `lease <ip> { ... }` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lease {
    /// Leased address.
    pub ip: Ipv4Addr,
    /// Link-layer address from `hardware ethernet`, kept verbatim.
    pub hardware_address: Option<String>,
    /// End of the lease. Unset when the block had no `ends` line.
    pub expiration: Option<DateTime<Utc>>,
    /// Sanitised, lowercase `client-hostname`.
    pub host_name: Option<String>,
}

impl Lease {
    /// Create a lease for `ip` with every optional field unset.
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            ip,
            hardware_address: None,
            expiration: None,
            host_name: None,
        }
    }

    /// Compare by expiration. A lease without one orders before every lease
    /// that has one.
    pub fn cmp_expiration(&self, other: &Lease) -> Ordering {
        self.expiration.cmp(&other.expiration)
    }

    /// The `(host name, address)` pair that identifies one published name.
    pub fn identity(&self) -> (Option<&str>, Ipv4Addr) {
        (self.host_name.as_deref(), self.ip)
    }
}

/// Turn a client-supplied host name into a DNS label.
///
/// Quote characters are dropped, `/`, `\`, `_` and spaces become `-`, leading
/// dashes are removed and the result is lowercased. Returns `None` when
/// nothing is left.
pub fn sanitize_host_name(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '"' | '\''))
        .map(|c| match c {
            '/' | '\\' | '_' | ' ' => '-',
            other => other,
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('-');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{sanitize_host_name, Lease};
    use chrono::{TimeZone, Utc};
    use std::cmp::Ordering;
    use std::net::Ipv4Addr;

    #[test]
    fn sanitize_drops_quotes_and_dashes_separators() {
        assert_eq!(sanitize_host_name("\"Bob's_PC\""), Some("bobs-pc".to_string()));
        assert_eq!(sanitize_host_name("\"Bob PC\""), Some("bob-pc".to_string()));
        assert_eq!(sanitize_host_name("a/b\\c"), Some("a-b-c".to_string()));
    }

    #[test]
    fn sanitize_strips_only_leading_dashes() {
        assert_eq!(sanitize_host_name("---x"), Some("x".to_string()));
        assert_eq!(sanitize_host_name("_x_"), Some("x-".to_string()));
    }

    #[test]
    fn sanitize_rejects_names_that_collapse_to_nothing() {
        assert_eq!(sanitize_host_name("\"___\""), None);
        assert_eq!(sanitize_host_name("\"\""), None);
        assert_eq!(sanitize_host_name(""), None);
    }

    #[test]
    fn missing_expiration_orders_first() {
        let open = Lease::new(Ipv4Addr::new(10, 0, 0, 1));
        let mut dated = Lease::new(Ipv4Addr::new(10, 0, 0, 2));
        dated.expiration = Some(Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap());

        assert_eq!(open.cmp_expiration(&dated), Ordering::Less);
        assert_eq!(dated.cmp_expiration(&open), Ordering::Greater);
        assert_eq!(open.cmp_expiration(&open.clone()), Ordering::Equal);
    }
}
