use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "dhcp2tinydns")]
#[command(version, about = "Add DHCP-leased hosts to tinydns")]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Build the tinydns data file from static fragments and the lease log.
    Generate(GenerateArgs),
    /// List the leases parsed from a lease log.
    Leases(LeasesArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Domain for hosts not covered by the subnet map (e.g. example.com makes
    /// host jdoe resolve as jdoe.example.com).
    #[arg(short, long)]
    pub domain: Option<String>,
    /// File of `<ip/prefix> <domain>` lines, e.g. `192.168.12.0/26 dmz.example.com`.
    #[arg(short = 'n', long)]
    pub subnet_map: Option<PathBuf>,
    /// dhcpd lease file [default: /var/lib/dhcpd/dhcpd.leases].
    #[arg(short, long)]
    pub leases: Option<PathBuf>,
    /// File of `<MAC> <host name>` lines for hosts that do not send a name.
    #[arg(short, long)]
    pub macfile: Option<PathBuf>,
    /// tinydns root directory [default: /etc/djbdns/tinydns].
    #[arg(short, long)]
    pub root: Option<PathBuf>,
    /// Static tinydns data files placed ahead of the generated records
    /// [default: ROOT/*.static].
    #[arg(short = 's', long = "static", num_args = 0..)]
    pub static_files: Option<Vec<PathBuf>>,
    /// Print the data file instead of writing it.
    #[arg(long)]
    pub dry_run: bool,
    /// Run tinydns-data in the root after writing.
    #[arg(long, conflicts_with = "dry_run")]
    pub make: bool,
    /// TOML file with defaults for the options above.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
pub struct LeasesArgs {
    /// dhcpd lease file.
    #[arg(short, long, default_value = dhcp2tinydns::settings::DEFAULT_LEASES)]
    pub leases: PathBuf,
    /// Only show the newest lease per host name and address.
    #[arg(long)]
    pub unique: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
