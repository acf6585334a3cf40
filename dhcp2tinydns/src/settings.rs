use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default location of the dhcpd lease log.
pub const DEFAULT_LEASES: &str = "/var/lib/dhcpd/dhcpd.leases";
/// Default tinydns root directory.
pub const DEFAULT_ROOT: &str = "/etc/djbdns/tinydns";

/// Defaults read from a TOML settings file.
///
/// Every key is optional and mirrors a `generate` flag. Relative paths are
/// taken relative to the directory holding the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub domain: Option<String>,
    pub subnet_map: Option<PathBuf>,
    pub leases: Option<PathBuf>,
    pub macfile: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub static_files: Option<Vec<PathBuf>>,
    pub make: Option<bool>,
}

/// Errors returned when loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let settings = parse_settings(&raw, path.display().to_string())?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(settings.relative_to(base))
}

fn parse_settings(raw: &str, path: String) -> Result<Settings, SettingsError> {
    toml::from_str(raw).map_err(|source| SettingsError::Parse { path, source })
}

impl Settings {
    fn relative_to(self, base: &Path) -> Self {
        let anchor = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        Self {
            subnet_map: self.subnet_map.map(anchor),
            leases: self.leases.map(anchor),
            macfile: self.macfile.map(anchor),
            root: self.root.map(anchor),
            static_files: self
                .static_files
                .map(|files| files.into_iter().map(anchor).collect()),
            ..self
        }
    }
}
