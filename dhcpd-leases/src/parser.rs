use std::net::Ipv4Addr;

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeDelta, TimeZone, Utc};
use thiserror::Error;

use crate::lease::{sanitize_host_name, Lease};

/// How far past `now` a lease with no end date is considered to run (52 weeks).
pub const NEVER_ENDS_HORIZON_SECS: i64 = 60 * 60 * 24 * 7 * 52;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Errors that can occur while reading a lease log.
///
/// Every variant is fatal for the whole log; there is no partial result.
#[derive(Debug, Error)]
pub enum LeaseError {
    /// Failed to read the lease file.
    #[error("failed to read lease file: {0}")]
    Io(#[from] std::io::Error),
    /// A `lease` line with no address after the keyword.
    #[error("line {line}: lease block has no address")]
    MissingAddress { line: usize },
    /// The address after `lease` is not an IPv4 address.
    #[error("line {line}: invalid lease address '{value}'")]
    InvalidAddress { line: usize, value: String },
    /// A recognised field is missing its value.
    #[error("line {line}: '{keyword}' has no value")]
    MissingValue { line: usize, keyword: &'static str },
    /// An `ends` timestamp that does not match `YYYY/MM/DD HH:MM:SS`.
    #[error("line {line}: invalid lease end '{value}': {source}")]
    InvalidTimestamp {
        line: usize,
        value: String,
        source: chrono::ParseError,
    },
    /// An `ends` timestamp that cannot be placed on the local clock.
    #[error("line {line}: lease end '{value}' does not exist in local time")]
    NonexistentLocalTime { line: usize, value: String },
}

enum State {
    OutsideBlock,
    InsideBlock(Lease),
}

/// Yield the meaningful lines of a lease log with their 1-based line numbers.
///
/// Lines are trimmed; blank lines and `#` comments are skipped.
pub fn lease_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse lease log text into completed leases, in file order.
pub fn parse(text: &str, now: DateTime<Utc>) -> Result<Vec<Lease>, LeaseError> {
    parse_lines(lease_lines(text), now)
}

/// Run the block state machine over pre-filtered lines.
///
/// A block only becomes a [`Lease`] once its closing `}` is seen; an
/// unterminated block at the end of input is dropped. `now` anchors leases
/// whose `ends` line carries no date.
pub fn parse_lines<'a, I>(lines: I, now: DateTime<Utc>) -> Result<Vec<Lease>, LeaseError>
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let mut leases = Vec::new();
    let mut state = State::OutsideBlock;

    for (line_no, line) in lines {
        state = match state {
            State::OutsideBlock if line.starts_with("lease ") => {
                State::InsideBlock(start_lease(line_no, line)?)
            }
            State::OutsideBlock => State::OutsideBlock,
            State::InsideBlock(lease) if line == "}" => {
                leases.push(lease);
                State::OutsideBlock
            }
            State::InsideBlock(mut lease) => {
                // Nested `lease` lines are malformed input; skip them.
                if !line.starts_with("lease ") {
                    update_field(&mut lease, line_no, line, now)?;
                }
                State::InsideBlock(lease)
            }
        };
    }

    Ok(leases)
}

fn start_lease(line_no: usize, line: &str) -> Result<Lease, LeaseError> {
    let value = line
        .split_whitespace()
        .nth(1)
        .ok_or(LeaseError::MissingAddress { line: line_no })?;
    let ip = value
        .parse::<Ipv4Addr>()
        .map_err(|_| LeaseError::InvalidAddress {
            line: line_no,
            value: value.to_string(),
        })?;
    Ok(Lease::new(ip))
}

fn update_field(
    lease: &mut Lease,
    line_no: usize,
    line: &str,
    now: DateTime<Utc>,
) -> Result<(), LeaseError> {
    let payload = line.strip_suffix(';').unwrap_or(line);
    let fields: Vec<&str> = payload.split_whitespace().collect();

    match fields.as_slice() {
        ["ends", ..] if fields.len() <= 3 => {
            lease.expiration = Some(now + TimeDelta::seconds(NEVER_ENDS_HORIZON_SECS));
        }
        ["ends", _weekday, date, time, ..] => {
            lease.expiration = Some(parse_local_timestamp(line_no, date, time)?);
        }
        ["hardware", "ethernet", mac, ..] => {
            lease.hardware_address = Some((*mac).to_string());
        }
        ["hardware", "ethernet"] => {
            return Err(LeaseError::MissingValue {
                line: line_no,
                keyword: "hardware ethernet",
            });
        }
        ["client-hostname"] => {
            return Err(LeaseError::MissingValue {
                line: line_no,
                keyword: "client-hostname",
            });
        }
        ["client-hostname", ..] => {
            let raw = payload
                .strip_prefix("client-hostname")
                .unwrap_or_default()
                .trim();
            if let Some(name) = sanitize_host_name(raw) {
                lease.host_name = Some(name);
            }
        }
        _ => {}
    }

    Ok(())
}

fn parse_local_timestamp(
    line_no: usize,
    date: &str,
    time: &str,
) -> Result<DateTime<Utc>, LeaseError> {
    let value = format!("{date} {}", time.trim_end_matches(';'));
    let naive = NaiveDateTime::parse_from_str(&value, TIMESTAMP_FORMAT).map_err(|source| {
        LeaseError::InvalidTimestamp {
            line: line_no,
            value: value.clone(),
            source,
        }
    })?;

    let local = match Local.from_local_datetime(&naive) {
        LocalResult::Single(at) => at,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Wall-clock times skipped by a DST jump land one hour later.
        LocalResult::None => Local
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
            .ok_or_else(|| LeaseError::NonexistentLocalTime {
                line: line_no,
                value: value.clone(),
            })?,
    };

    Ok(local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::{parse, LeaseError, NEVER_ENDS_HORIZON_SECS};
    use crate::Lease;
    use chrono::{Local, TimeDelta, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::net::Ipv4Addr;

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_single_block_fields() {
        let text = r#"
lease 192.168.1.20 {
  starts 3 2024/05/29 10:00:00;
  ends 3 2024/05/29 22:00:00;
  binding state active;
  hardware ethernet 00:11:22:33:44:55;
  client-hostname "Laptop_01";
}
"#;
        let leases = parse(text, now()).expect("parse");
        assert_eq!(leases.len(), 1);

        let lease = &leases[0];
        let expected_end = Local
            .with_ymd_and_hms(2024, 5, 29, 22, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(lease.ip, Ipv4Addr::new(192, 168, 1, 20));
        assert_eq!(lease.hardware_address.as_deref(), Some("00:11:22:33:44:55"));
        assert_eq!(lease.expiration, Some(expected_end));
        assert_eq!(lease.host_name.as_deref(), Some("laptop-01"));
    }

    #[test]
    fn unterminated_trailing_block_is_dropped() {
        let text = "lease 10.0.0.1 {\n  hardware ethernet aa:bb;\n}\nlease 10.0.0.2 {\n  hardware ethernet cc:dd;\n";
        let leases = parse(text, now()).expect("parse");
        assert_eq!(leases.len(), 1);
        assert_eq!(leases[0].ip, Ipv4Addr::new(10, 0, 0, 1));
    }

    #[test]
    fn ends_without_date_runs_a_year_past_now() {
        let text = "lease 10.0.0.1 {\n  ends never;\n}\n";
        let leases = parse(text, now()).expect("parse");
        assert_eq!(
            leases[0].expiration,
            Some(now() + TimeDelta::seconds(NEVER_ENDS_HORIZON_SECS))
        );
    }

    #[test]
    fn block_without_ends_has_no_expiration() {
        let leases = parse("lease 10.0.0.1 {\n}\n", now()).expect("parse");
        assert_eq!(leases[0].expiration, None);
        assert_eq!(leases[0].hardware_address, None);
        assert_eq!(leases[0].host_name, None);
    }

    #[test]
    fn nested_lease_line_does_not_open_a_new_block() {
        let text = "lease 10.0.0.1 {\nlease 10.0.0.9 {\n  client-hostname \"a\";\n}\n";
        let leases = parse(text, now()).expect("parse");
        assert_eq!(leases.len(), 1);
        assert_eq!(leases[0].ip, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(leases[0].host_name.as_deref(), Some("a"));
    }

    #[test]
    fn lines_outside_blocks_and_unknown_fields_are_ignored() {
        let text = "authoring-byte-order little-endian;\nserver-duid \"x\";\n# comment\nlease 10.0.0.1 {\n  uid \"\\001\";\n  set vendor-class-identifier = \"foo\";\n}\n";
        let leases = parse(text, now()).expect("parse");
        assert_eq!(leases.len(), 1);
        assert_eq!(leases[0], Lease::new(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn empty_host_name_keeps_previous_value() {
        let text = "lease 10.0.0.1 {\n  client-hostname \"box\";\n  client-hostname \"___\";\n}\n";
        let leases = parse(text, now()).expect("parse");
        assert_eq!(leases[0].host_name.as_deref(), Some("box"));
    }

    #[test]
    fn malformed_end_date_fails_the_whole_load() {
        let text = "lease 10.0.0.1 {\n  ends 3 2024-05-29 22:00:00;\n}\n";
        let err = parse(text, now()).expect_err("bad date should fail");
        match err {
            LeaseError::InvalidTimestamp { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn invalid_address_is_reported_with_line() {
        let err = parse("\nlease nope {\n}\n", now()).expect_err("bad address");
        match err {
            LeaseError::InvalidAddress { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "nope");
            }
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn hardware_line_without_address_is_fatal() {
        let err = parse("lease 10.0.0.1 {\n  hardware ethernet;\n}\n", now())
            .expect_err("missing mac");
        assert!(matches!(err, LeaseError::MissingValue { line: 2, .. }));
    }
}
