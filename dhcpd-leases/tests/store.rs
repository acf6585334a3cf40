use std::fs;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use chrono::{TimeDelta, TimeZone, Utc};
use dhcpd_leases::{LeaseError, LeaseStore, NEVER_ENDS_HORIZON_SECS};
use pretty_assertions::assert_eq;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap()
}

#[test]
fn loads_every_closed_block_from_fixture() {
    let store = LeaseStore::load(&fixture("fixtures/dhcpd.leases"), now()).expect("load");

    // The trailing 192.168.10.99 block is never closed.
    assert_eq!(store.len(), 6);
    assert!(store.iter().all(|l| l.ip != Ipv4Addr::new(192, 168, 10, 99)));
}

#[test]
fn store_is_ordered_latest_expiration_first() {
    let store = LeaseStore::load(&fixture("fixtures/dhcpd.leases"), now()).expect("load");
    let order: Vec<Ipv4Addr> = store.iter().map(|l| l.ip).collect();

    assert_eq!(
        order,
        vec![
            Ipv4Addr::new(192, 168, 10, 20),
            Ipv4Addr::new(192, 168, 10, 22),
            Ipv4Addr::new(192, 168, 10, 23),
            Ipv4Addr::new(10, 1, 2, 3),
            Ipv4Addr::new(192, 168, 10, 20),
            Ipv4Addr::new(192, 168, 10, 21),
        ]
    );
}

#[test]
fn never_ending_lease_runs_a_year_past_now() {
    let store = LeaseStore::load(&fixture("fixtures/dhcpd.leases"), now()).expect("load");
    let lease = store.lookup("00:16:3e:00:00:03").expect("known mac");

    assert_eq!(lease.host_name.as_deref(), Some("build-server"));
    assert_eq!(
        lease.expiration,
        Some(now() + TimeDelta::seconds(NEVER_ENDS_HORIZON_SECS))
    );
}

#[test]
fn unique_view_keeps_latest_renewal_only() {
    let store = LeaseStore::load(&fixture("fixtures/dhcpd.leases"), now()).expect("load");

    let host1: Vec<_> = store
        .unique_by_identity()
        .filter(|l| l.host_name.as_deref() == Some("host1"))
        .collect();
    assert_eq!(host1.len(), 1);
    assert!(host1[0].expiration.expect("dated") > now());
    assert_eq!(store.unique_by_identity().count(), 5);
}

#[test]
fn lookup_returns_active_lease_for_renewed_mac() {
    let store = LeaseStore::load(&fixture("fixtures/dhcpd.leases"), now()).expect("load");
    let lease = store.lookup("00:16:3e:00:00:01").expect("known mac");
    assert!(lease.expiration.expect("dated") > now());
    assert!(store.lookup("ff:ff:ff:ff:ff:ff").is_err());
}

#[test]
fn corrupt_date_fails_load() {
    let err = LeaseStore::load(&fixture("fixtures/bad-date.leases"), now())
        .expect_err("corrupt date should fail");
    assert!(matches!(err, LeaseError::InvalidTimestamp { line: 2, .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = LeaseStore::load(&dir.path().join("absent.leases"), now()).expect_err("missing");
    assert!(matches!(err, LeaseError::Io(_)));
}

#[test]
fn tolerates_non_utf8_client_bytes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("raw.leases");
    let mut bytes = b"lease 10.0.0.7 {\n  client-hostname \"caf".to_vec();
    bytes.push(0xe9);
    bytes.extend_from_slice(b"\";\n}\n");
    fs::write(&path, bytes).expect("write leases");

    let store = LeaseStore::load(&path, now()).expect("load");
    assert_eq!(store.len(), 1);
    assert!(store.iter().next().and_then(|l| l.host_name.as_deref()).is_some());
}
