use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use dhcpd_leases::Lease;

/// Render leases as an aligned table with an active/expired state column.
pub fn render_lease_table<'a, I>(leases: I, now: DateTime<Utc>) -> String
where
    I: IntoIterator<Item = &'a Lease>,
{
    let mut out = vec![format!(
        "{:<16} {:<18} {:<24} {:<20} {}",
        "IP Address", "Hardware", "Host", "Expires", "State"
    )];
    out.push("-".repeat(86));

    for lease in leases {
        let expires = lease
            .expiration
            .map(|at| {
                at.with_timezone(&Local)
                    .format("%Y/%m/%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| "-".to_string());
        let state = match lease.expiration {
            Some(at) if at <= now => "expired".red().to_string(),
            _ => "active".green().to_string(),
        };
        out.push(format!(
            "{:<16} {:<18} {:<24} {:<20} {}",
            lease.ip,
            lease.hardware_address.as_deref().unwrap_or("-"),
            lease.host_name.as_deref().unwrap_or("-"),
            expires,
            state
        ));
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::render_lease_table;
    use chrono::{TimeDelta, TimeZone, Utc};
    use dhcpd_leases::Lease;
    use std::net::Ipv4Addr;

    #[test]
    fn marks_past_leases_expired() {
        colored::control::set_override(false);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut old = Lease::new(Ipv4Addr::new(10, 0, 0, 1));
        old.expiration = Some(now - TimeDelta::hours(1));
        old.host_name = Some("old".to_string());
        let mut open = Lease::new(Ipv4Addr::new(10, 0, 0, 2));
        open.hardware_address = Some("aa:bb".to_string());

        let table = render_lease_table([&old, &open], now);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("10.0.0.1"));
        assert!(lines[2].contains("old"));
        assert!(lines[2].ends_with("expired"));
        assert!(lines[3].contains("aa:bb"));
        assert!(lines[3].ends_with("active"));
    }
}
