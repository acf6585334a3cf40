//! Readers for the administrator-maintained input files.
//!
//! The subnet map and the MAC override file are whitespace-separated pairs,
//! one per line; blank lines and `#` comments are ignored. Static fragments are
//! tinydns data lines copied ahead of the generated records.

use std::fs;
use std::path::Path;

use ipnet::Ipv4Net;
use thiserror::Error;

use crate::domain_map::dedot;
use crate::records::MacOverride;
use crate::tinydns::{DataLine, DataLineError, Section};

/// Errors returned when reading an input file.
#[derive(Debug, Error)]
pub enum InputFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("{path}:{line}: expected 2 fields, found {found}")]
    FieldCount {
        path: String,
        line: usize,
        found: usize,
    },
    #[error("{path}:{line}: invalid network '{value}': {source}")]
    InvalidNetwork {
        path: String,
        line: usize,
        value: String,
        source: ipnet::AddrParseError,
    },
    #[error("{path}:{line}: network '{value}' has host bits set")]
    HostBitsSet {
        path: String,
        line: usize,
        value: String,
    },
    #[error("{path}:{line}: domain is empty")]
    EmptyDomain { path: String, line: usize },
    #[error("{path}:{line}: {source}")]
    DataLine {
        path: String,
        line: usize,
        source: DataLineError,
    },
}

/// Trimmed, non-blank, non-comment lines with their 1-based line numbers.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn read(path: &Path) -> Result<String, InputFileError> {
    fs::read_to_string(path).map_err(|source| InputFileError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn pair<'a>(
    origin: &str,
    line_no: usize,
    line: &'a str,
) -> Result<(&'a str, &'a str), InputFileError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [first, second] => Ok((*first, *second)),
        _ => Err(InputFileError::FieldCount {
            path: origin.to_string(),
            line: line_no,
            found: fields.len(),
        }),
    }
}

/// Load `<CIDR> <domain>` pairs from a subnet map file.
pub fn load_subnet_map(path: &Path) -> Result<Vec<(Ipv4Net, String)>, InputFileError> {
    parse_subnet_map(&read(path)?, &path.display().to_string())
}

/// Parse subnet map text. `origin` names the source in errors.
///
/// Domains are dedotted. Networks must be written with their host bits clear.
pub fn parse_subnet_map(
    text: &str,
    origin: &str,
) -> Result<Vec<(Ipv4Net, String)>, InputFileError> {
    let mut entries = Vec::new();
    for (line_no, line) in content_lines(text) {
        let (cidr, domain) = pair(origin, line_no, line)?;
        let network: Ipv4Net = cidr.parse().map_err(|source| InputFileError::InvalidNetwork {
            path: origin.to_string(),
            line: line_no,
            value: cidr.to_string(),
            source,
        })?;
        if network != network.trunc() {
            return Err(InputFileError::HostBitsSet {
                path: origin.to_string(),
                line: line_no,
                value: cidr.to_string(),
            });
        }
        let domain = dedot(domain);
        if domain.is_empty() {
            return Err(InputFileError::EmptyDomain {
                path: origin.to_string(),
                line: line_no,
            });
        }
        entries.push((network, domain.to_string()));
    }
    Ok(entries)
}

/// Load `<MAC> <host name>` pairs, in file order.
pub fn load_mac_overrides(path: &Path) -> Result<Vec<MacOverride>, InputFileError> {
    parse_mac_overrides(&read(path)?, &path.display().to_string())
}

pub fn parse_mac_overrides(text: &str, origin: &str) -> Result<Vec<MacOverride>, InputFileError> {
    content_lines(text)
        .map(|(line_no, line)| {
            let (mac, host) = pair(origin, line_no, line)?;
            Ok(MacOverride {
                hardware_address: mac.to_string(),
                host_name: host.to_string(),
            })
        })
        .collect()
}

/// Load a static fragment as a section tied to its file.
///
/// Blank lines are dropped; comments are kept. A line with an unknown marker
/// fails the load.
pub fn load_static_section(path: &Path) -> Result<Section, InputFileError> {
    let text = read(path)?;
    let origin = path.display().to_string();
    let mut section = Section::from_source(path);
    section.extend(parse_static_lines(&text, &origin)?);
    Ok(section)
}

pub fn parse_static_lines(text: &str, origin: &str) -> Result<Vec<DataLine>, InputFileError> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_no, line)| {
            DataLine::parse(line).map_err(|source| InputFileError::DataLine {
                path: origin.to_string(),
                line: line_no,
                source,
            })
        })
        .collect()
}
