use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use super::DataLine;

/// Data lines that belong together, such as one static file or one domain's
/// generated records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    source: Option<PathBuf>,
    lines: Vec<DataLine>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty section read from, or destined for, `path`.
    pub fn from_source(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(path.into()),
            lines: Vec::new(),
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn add(&mut self, line: DataLine) {
        self.lines.push(line);
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = DataLine>) {
        self.lines.extend(lines);
    }

    pub fn lines(&self) -> &[DataLine] {
        &self.lines
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Everything tinydns serves, as an ordered list of sections.
///
/// Rendered sections are separated by one blank line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthoritativeDns {
    sections: Vec<Section>,
}

impl AuthoritativeDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepend(&mut self, section: Section) {
        self.sections.insert(0, section);
    }

    pub fn append(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    /// Lines from every section for which `predicate` holds, in order.
    pub fn search<F>(&self, mut predicate: F) -> Vec<&DataLine>
    where
        F: FnMut(&DataLine) -> bool,
    {
        self.sections
            .iter()
            .flat_map(|s| s.lines())
            .filter(|line| predicate(line))
            .collect()
    }
}

impl Display for AuthoritativeDns {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{section}")?;
        }
        Ok(())
    }
}
