//! Layout of the generated tinydns data file.

use std::path::Path;

use crate::records::ZoneRecords;
use crate::tinydns::{AuthoritativeDns, DataLine, Section};

const LINE_LENGTH: usize = 79;
const HEADER_WIDTH: usize = LINE_LENGTH - 19;

/// Banner comment introducing one domain's generated records.
///
/// Fits on one line framed by `spacer` runs when there is room, otherwise
/// spills over three comment lines.
pub fn dhcp_header(domain: &str, spacer: char) -> String {
    let message = format!("DHCP-Leased records for: {domain}");
    let room = HEADER_WIDTH as isize - message.chars().count() as isize - 4;
    let spacer_count = room.div_euclid(2);

    if spacer_count > 0 {
        let run: String = std::iter::repeat(spacer).take(spacer_count as usize).collect();
        format!(" {run} {message} {run}")
    } else {
        let run: String = std::iter::repeat(spacer).take(HEADER_WIDTH).collect();
        format!(" {run}\n# {message}\n# {run}")
    }
}

fn banner(static_files: &[&Path]) -> Section {
    let mut section = Section::new();
    section.add(DataLine::comment(" DO NOT EDIT! ALL CHANGES WILL BE LOST!"));
    section.add(DataLine::comment(
        " This file is generated automatically from the following files.",
    ));
    section.add(DataLine::comment(" Edit them instead:"));
    for path in static_files {
        section.add(DataLine::comment(path.display().to_string()));
    }
    section
}

/// Assemble the complete data file: warning banner, static fragments in the
/// order given, then one section per domain of generated records.
pub fn build_document(static_sections: Vec<Section>, records: &ZoneRecords) -> AuthoritativeDns {
    let header = {
        let static_files: Vec<&Path> = static_sections.iter().filter_map(Section::source).collect();
        banner(&static_files)
    };

    let mut dns = AuthoritativeDns::new();
    for section in static_sections {
        dns.append(section);
    }
    dns.prepend(header);

    if records.is_empty() {
        return dns;
    }

    let divider = "_".repeat(14);
    let mut start = Section::new();
    start.add(DataLine::comment(format!(
        " {divider} Everything below this line generated from DHCP {divider}"
    )));
    dns.append(start);

    for group in records.groups() {
        let mut section = Section::new();
        section.add(DataLine::comment(dhcp_header(&group.domain, '=')));
        section.extend(
            group
                .records
                .iter()
                .map(|r| DataLine::alias(&r.fqdn, r.ip, Some(r.ttl))),
        );
        dns.append(section);
    }

    dns
}

#[cfg(test)]
mod tests {
    use super::{build_document, dhcp_header, HEADER_WIDTH};
    use crate::domain_map::DomainMapBuilder;
    use crate::records::{assemble, AliasRecord, ZoneRecords};
    use crate::tinydns::{DataLine, Marker, Section};
    use chrono::{TimeZone, Utc};
    use dhcpd_leases::LeaseStore;
    use pretty_assertions::assert_eq;
    use std::net::Ipv4Addr;

    #[test]
    fn short_domain_header_fits_on_one_line() {
        let header = dhcp_header("lan.example", '=');
        // 60 - 36 - 4 = 20, so 10 spacers each side.
        assert_eq!(
            header,
            " ========== DHCP-Leased records for: lan.example =========="
        );
    }

    #[test]
    fn long_domain_header_spills_over_three_lines() {
        let domain = "a-very-long-subdomain.of-an-even-longer.example.com";
        let header = dhcp_header(domain, '=');
        let run = "=".repeat(HEADER_WIDTH);
        assert_eq!(
            header,
            format!(" {run}\n# DHCP-Leased records for: {domain}\n# {run}")
        );
    }

    #[test]
    fn document_without_records_has_no_dhcp_divider() {
        let mut fragment = Section::from_source("/etc/tinydns/10-core.static");
        fragment.add(DataLine::parse("=www.example:192.0.2.1").expect("line"));

        let text = build_document(vec![fragment], &ZoneRecords::default()).to_string();
        assert_eq!(
            text,
            "# DO NOT EDIT! ALL CHANGES WILL BE LOST!\n\
             # This file is generated automatically from the following files.\n\
             # Edit them instead:\n\
             #/etc/tinydns/10-core.static\n\
             \n\
             =www.example:192.0.2.1\n"
        );
    }

    #[test]
    fn generated_sections_follow_the_banner() {
        let mut records = ZoneRecords::default();
        records.push(
            "lan.example",
            AliasRecord {
                fqdn: "pc.lan.example".to_string(),
                ip: Ipv4Addr::new(192, 168, 1, 4),
                ttl: 600,
            },
        );

        let text = build_document(Vec::new(), &records).to_string();
        let expected = format!(
            "# DO NOT EDIT! ALL CHANGES WILL BE LOST!\n\
             # This file is generated automatically from the following files.\n\
             # Edit them instead:\n\
             \n\
             # {d} Everything below this line generated from DHCP {d}\n\
             \n\
             # ========== DHCP-Leased records for: lan.example ==========\n\
             =pc.lan.example:192.168.1.4:600\n",
            d = "_".repeat(14)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn client_host_name_cannot_add_fields_to_its_record() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let text = "lease 192.168.1.5 {\n  ends never;\n  client-hostname \"www.bank.com:6.6.6.6:86400:\";\n}\n";
        let store = LeaseStore::parse(text, now).expect("parse");
        let mut domains = DomainMapBuilder::default();
        domains.set_default("lan.example");
        let assembly = assemble(&store, &domains.build(), &[], now).expect("assemble");

        let document = build_document(Vec::new(), &assembly.records);
        let aliases = document.search(|line| line.marker() == Marker::AliasWithPtr);
        assert_eq!(aliases.len(), 1);

        let rendered = aliases[0].to_string();
        let fields: Vec<&str> = rendered[1..].split(':').collect();
        assert_eq!(
            fields,
            vec![
                "www.bank.com\\0726.6.6.6\\07286400\\072.lan.example",
                "192.168.1.5",
                "86400"
            ]
        );
    }
}
