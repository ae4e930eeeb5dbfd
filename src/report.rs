//
// report.rs
// Dicom-Anonymizer-rs
//
// Renders the converted-study registry as a fixed-width summary table.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fmt::Write as _;
use std::io;

use crate::registry::StudyRegistry;

const HEADERS: [&str; 3] = ["Accession Number", "Patient ID", "Patient Name"];

fn push_row(out: &mut String, accession: &str, patient_id: &str, patient_name: &str) {
    let _ = writeln!(out, "{:<16} {:<16} {}", accession, patient_id, patient_name);
}

/// Header, a dashed underline per column, then one row per study sorted by
/// patient ID and accession number.
pub fn render(registry: &StudyRegistry) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADERS[0], HEADERS[1], HEADERS[2]);

    let dashes = HEADERS.map(|h| "-".repeat(h.len()));
    push_row(&mut out, &dashes[0], &dashes[1], &dashes[2]);

    for study in registry.sorted() {
        push_row(
            &mut out,
            &study.accession_number,
            &study.patient_id,
            &study.patient_name,
        );
    }
    out
}

/// Print the summary table unless `quiet` is set.
pub fn write_summary<W: io::Write>(
    out: &mut W,
    registry: &StudyRegistry,
    quiet: bool,
) -> io::Result<()> {
    if quiet {
        return Ok(());
    }
    out.write_all(render(registry).as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ConvertedStudy;

    fn sample_registry() -> StudyRegistry {
        [
            ConvertedStudy::new("A2", "P2", "N2"),
            ConvertedStudy::new("A1", "P1", "N1"),
            ConvertedStudy::new("A1", "P3", "N3"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn table_has_header_dashes_and_sorted_rows() {
        let table = render(&sample_registry());
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Accession Number Patient ID       Patient Name",
                "---------------- ----------       ------------",
                "A1               P1               N1",
                "A2               P2               N2",
                "A1               P3               N3",
            ]
        );
    }

    #[test]
    fn empty_registry_still_prints_headers() {
        let table = render(&StudyRegistry::new());
        assert_eq!(table.lines().count(), 2);
    }

    #[test]
    fn long_values_are_not_truncated() {
        let registry: StudyRegistry = [ConvertedStudy::new("ACCESSION-0123456789", "P", "N")]
            .into_iter()
            .collect();
        let table = render(&registry);
        assert!(table.contains("ACCESSION-0123456789 P                N"));
    }

    #[test]
    fn quiet_writes_nothing() {
        let mut buffer = Vec::new();
        write_summary(&mut buffer, &sample_registry(), true).expect("write");
        assert!(buffer.is_empty());

        write_summary(&mut buffer, &sample_registry(), false).expect("write");
        assert!(String::from_utf8(buffer).unwrap().starts_with("Accession Number"));
    }
}
