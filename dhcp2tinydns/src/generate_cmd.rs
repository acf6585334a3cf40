//! The `generate` command: lease log in, tinydns data file out.
//!
//! Every input is read and every record assembled before anything is written,
//! so a bad lease log, map or fragment leaves the existing `data` file as it
//! was.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use colored::Colorize;
use dhcp2tinydns::domain_map::{dedot, DomainMap, DomainMapBuilder};
use dhcp2tinydns::input_files::{load_mac_overrides, load_static_section, load_subnet_map};
use dhcp2tinydns::merge::{compile_data, discover_static_files, write_data, TINYDNS_DATA};
use dhcp2tinydns::records::assemble;
use dhcp2tinydns::settings::{load_settings, Settings, DEFAULT_LEASES, DEFAULT_ROOT};
use dhcp2tinydns::summary::{render as render_summary, summarize};
use dhcp2tinydns::zone_data::build_document;
use dhcpd_leases::LeaseStore;
use tracing::{info, warn};

use crate::cli::GenerateArgs;

/// Flags merged over the settings file merged over built-in defaults.
#[derive(Debug)]
struct GenerateOptions {
    domain: Option<String>,
    subnet_map: Option<PathBuf>,
    leases: PathBuf,
    macfile: Option<PathBuf>,
    root: PathBuf,
    static_files: Option<Vec<PathBuf>>,
    dry_run: bool,
    make: bool,
}

impl GenerateOptions {
    fn resolve(args: GenerateArgs, settings: Settings) -> Self {
        Self {
            domain: args.domain.or(settings.domain),
            subnet_map: args.subnet_map.or(settings.subnet_map),
            leases: args
                .leases
                .or(settings.leases)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEASES)),
            macfile: args.macfile.or(settings.macfile),
            root: args
                .root
                .or(settings.root)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT)),
            static_files: args.static_files.or(settings.static_files),
            dry_run: args.dry_run,
            make: !args.dry_run && (args.make || settings.make.unwrap_or(false)),
        }
    }
}

/// Execute the `generate` command.
///
/// # Errors
///
/// Returns error if:
/// - The settings file, subnet map, MAC file or a static fragment cannot be read
/// - The lease log cannot be read or contains a malformed block
/// - A named lease's address maps to no domain
/// - The data file cannot be written or tinydns-data fails
pub fn run_generate(args: GenerateArgs) -> Result<()> {
    let settings = match &args.config {
        Some(path) => load_settings(path)
            .with_context(|| format!("failed to load settings {}", path.display()))?,
        None => Settings::default(),
    };
    let options = GenerateOptions::resolve(args, settings);
    let now = Utc::now();

    let domains = build_domain_map(options.subnet_map.as_deref(), options.domain.as_deref())?;

    let static_files = match options.static_files {
        Some(files) => files,
        None => discover_static_files(&options.root)?,
    };
    let static_sections = static_files
        .iter()
        .map(|path| load_static_section(path))
        .collect::<Result<Vec<_>, _>>()
        .context("failed to read static tinydns data")?;

    let store = LeaseStore::load(&options.leases, now)
        .with_context(|| format!("failed to load leases from {}", options.leases.display()))?;
    info!(leases = store.len(), path = %options.leases.display(), "loaded lease log");

    let overrides = match &options.macfile {
        Some(path) => load_mac_overrides(path)?,
        None => Vec::new(),
    };

    let assembly = assemble(&store, &domains, &overrides, now)
        .context("failed to assemble alias records")?;
    let document = build_document(static_sections, &assembly.records);

    if options.dry_run {
        println!("{document}");
        return Ok(());
    }

    write_data(&options.root, &document.to_string())?;
    if options.make {
        compile_data(&options.root, TINYDNS_DATA)?;
    }

    let summary = summarize(store.len(), &assembly, &document);
    println!("{}", render_summary(summary).cyan());
    Ok(())
}

fn build_domain_map(subnet_map: Option<&Path>, domain: Option<&str>) -> Result<DomainMap> {
    let mut builder = DomainMapBuilder::default();

    if let Some(path) = subnet_map {
        for (network, name) in load_subnet_map(path)? {
            builder.insert(network, name);
        }
    }

    if let Some(raw) = domain {
        let domain = dedot(raw);
        if domain.is_empty() {
            bail!("--domain '{raw}' is empty once leading dots are removed");
        }
        if let Some(previous) = builder.set_default(domain) {
            warn!("--domain {domain} overrides catch-all subnet map domain {previous}");
        }
    }

    if builder.is_empty() {
        warn!("no domains configured; any named lease will fail to resolve");
    }
    Ok(builder.build())
}
