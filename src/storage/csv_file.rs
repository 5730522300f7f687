use crate::model::{CatalogError, ReportError};
use crate::report::PriceReport;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const SNIFF_SAMPLE_BYTES: usize = 5000;
const DELIMITER_CANDIDATES: [u8; 4] = [b';', b',', b'\t', b'|'];
pub const REPORT_DELIMITER: u8 = b';';

/// Picks the candidate delimiter present on the most lines of the sample.
/// Ties go to the earlier candidate.
pub fn sniff_delimiter(content: &str) -> u8 {
    let mut end = content.len().min(SNIFF_SAMPLE_BYTES);
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    let sample = &content[..end];

    let mut best: Option<(u8, usize)> = None;
    for candidate in DELIMITER_CANDIDATES {
        let lines = sample
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter(|line| line.as_bytes().contains(&candidate))
            .count();
        if lines > 0 && best.is_none_or(|(_, most)| lines > most) {
            best = Some((candidate, lines));
        }
    }

    match best {
        Some((delimiter, lines)) => {
            debug!("Sniffed delimiter {:?} on {} lines", delimiter as char, lines);
            delimiter
        }
        None => {
            warn!("Could not determine delimiter, falling back to ','");
            b','
        }
    }
}

/// Reads every record of a CSV file with a sniffed delimiter. Record lengths may vary.
pub fn read_records(path: &Path) -> Result<Vec<Vec<String>>, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    parse_records(content, sniff_delimiter(content)).map_err(|source| CatalogError::Csv {
        path: path.display().to_string(),
        source,
    })
}

fn parse_records(content: &str, delimiter: u8) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(String::from).collect());
    }
    Ok(records)
}

pub fn write_report(path: &Path, report: &PriceReport) -> Result<(), ReportError> {
    let write_err = |source| ReportError::Write {
        path: path.display().to_string(),
        source,
    };
    let mut writer = WriterBuilder::new()
        .delimiter(REPORT_DELIMITER)
        .flexible(false)
        .from_path(path)
        .map_err(write_err)?;

    writer.write_record(&report.headers).map_err(write_err)?;
    for row in &report.rows {
        writer.write_record(row).map_err(write_err)?;
    }
    writer.flush().map_err(|source| ReportError::Flush {
        path: path.display().to_string(),
        source,
    })
}
