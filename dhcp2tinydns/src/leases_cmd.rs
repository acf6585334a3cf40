use anyhow::{Context, Result};
use chrono::Utc;
use dhcp2tinydns::lease_report::render_lease_table;
use dhcpd_leases::{Lease, LeaseStore};

use crate::cli::{LeasesArgs, OutputFormat};

pub fn run_leases(args: LeasesArgs) -> Result<()> {
    let now = Utc::now();
    let store = LeaseStore::load(&args.leases, now)
        .with_context(|| format!("failed to load leases from {}", args.leases.display()))?;

    let leases: Vec<&Lease> = if args.unique {
        store.unique_by_identity().collect()
    } else {
        store.iter().collect()
    };

    match args.format {
        OutputFormat::Text => println!("{}", render_lease_table(leases, now)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&leases)?),
    }
    Ok(())
}
