use serde::Serialize;

use crate::records::Assembly;
use crate::tinydns::{AuthoritativeDns, Marker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerateSummary {
    pub leases: usize,
    pub domains: usize,
    pub records: usize,
    pub reserved: usize,
    pub static_files: usize,
    pub static_records: usize,
}

/// Count what a run produced. `document` must be the file built from
/// `assembly`, so generated aliases are subtracted from its record lines.
pub fn summarize(
    leases: usize,
    assembly: &Assembly,
    document: &AuthoritativeDns,
) -> GenerateSummary {
    let records = assembly.records.record_count();
    let record_lines = document
        .search(|line| !matches!(line.marker(), Marker::Comment))
        .len();
    GenerateSummary {
        leases,
        domains: assembly.records.groups().len(),
        records,
        reserved: assembly.unassigned.len(),
        static_files: document.iter().filter(|s| s.source().is_some()).count(),
        static_records: record_lines.saturating_sub(records),
    }
}

pub fn render(summary: GenerateSummary) -> String {
    format!(
        "generate_summary leases={} domains={} records={} reserved={} static_files={} static_records={}",
        summary.leases,
        summary.domains,
        summary.records,
        summary.reserved,
        summary.static_files,
        summary.static_records
    )
}
