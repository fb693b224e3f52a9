//! Dataset and report persistence.
//!
//! Fetched datasets and the match report are plain JSON documents on disk;
//! the CSV export flattens the report for spreadsheet review, matched rows
//! first. No CSV library: the quoting rules needed here fit in one
//! function.

use std::fs;
use std::path::Path;

use gm_match::MatchReport;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors from dataset/report persistence.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("file I/O failed for {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Read a JSON document from disk.
///
/// # Errors
/// Returns an error when the file cannot be read or parsed.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, ReportError> {
    let content = fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ReportError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Write a JSON document to disk (pretty-printed), creating parent
/// directories as needed.
///
/// # Errors
/// Returns an error when the document cannot be serialized or written.
pub fn write_json_file<T: Serialize>(value: &T, path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })?;
    }
    let content = serde_json::to_vec_pretty(value).map_err(|source| ReportError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, content).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })
}

const CSV_HEADER: [&str; 9] = [
    "YouTube ID",
    "YouTube Title",
    "YouTube Date",
    "YouTube URL",
    "Congress Event ID",
    "Congress Title",
    "Match Score",
    "Match Reasons",
    "Status",
];

/// Export a match report as CSV: one row per video, matched rows first.
///
/// # Errors
/// Returns an error when the file cannot be written.
pub fn write_csv(report: &MatchReport, path: &Path) -> Result<(), ReportError> {
    let mut out = String::new();
    out.push_str(&csv_row(&CSV_HEADER.map(String::from)));

    for m in &report.matches {
        out.push_str(&csv_row(&[
            m.video_id.clone(),
            m.video_title.clone(),
            m.video_date.map(|d| d.to_string()).unwrap_or_default(),
            m.video_url.clone(),
            m.event_id.clone(),
            m.event_title.clone(),
            format!("{:.2}", m.score),
            m.reasons.join(" | "),
            "Matched".to_string(),
        ]));
    }

    for u in &report.unmatched {
        out.push_str(&csv_row(&[
            u.video_id.clone(),
            u.video_title.clone(),
            u.video_date.map(|d| d.to_string()).unwrap_or_default(),
            format!("https://www.youtube.com/watch?v={}", u.video_id),
            String::new(),
            u.best_match_title.clone().unwrap_or_default(),
            format!("{:.2}", u.best_score),
            String::new(),
            "Unmatched".to_string(),
        ]));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })?;
    }
    fs::write(path, out).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn csv_row(fields: &[String]) -> String {
    let mut row = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

/// Quote a field when it contains a delimiter, quote, or newline; embedded
/// quotes are doubled per RFC 4180.
fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use gm_match::{MatchMethod, MatchResult, ReportMetadata, UnmatchedVideo};

    fn report() -> MatchReport {
        MatchReport {
            metadata: ReportMetadata {
                total_videos: 2,
                total_events: 1,
                matched: 1,
                unmatched: 1,
                algorithmic_matches: 1,
                adjudicated_matches: 0,
                match_rate: "50.0%".into(),
                generated_at: Utc::now(),
            },
            matches: vec![MatchResult {
                video_id: "abc123".into(),
                video_title: "Markup of H.R. 1234, \"The SPECTRUM Act\"".into(),
                video_url: "https://www.youtube.com/watch?v=abc123".into(),
                video_date: NaiveDate::from_ymd_opt(2024, 3, 5),
                event_id: "115538".into(),
                event_title: "Markup".into(),
                event_date: NaiveDate::from_ymd_opt(2024, 3, 5),
                event_url: "https://www.congress.gov/event/118th-congress/house-event/115538"
                    .into(),
                committee: "House Energy and Commerce".into(),
                score: 0.775,
                reasons: vec!["Exact date match: 2024-03-05".into(), "Event type match: markup".into()],
                method: MatchMethod::Algorithmic,
                adjudicator_confidence: None,
                adjudicator_reasoning: None,
            }],
            unmatched: vec![UnmatchedVideo {
                video_id: "xyz789".into(),
                video_title: "Channel Trailer".into(),
                video_date: None,
                best_score: 0.12,
                best_match_title: Some("Markup".into()),
            }],
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_video() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.csv");
        write_csv(&report(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("YouTube ID,YouTube Title"));
        assert!(lines[1].ends_with("Matched"));
        assert!(lines[2].ends_with("Unmatched"));
    }

    #[test]
    fn csv_quotes_commas_and_doubles_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.csv");
        write_csv(&report(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        // Title with a comma and embedded quotes round-trips quoted.
        assert!(content.contains(r#""Markup of H.R. 1234, ""The SPECTRUM Act""""#));
        // Reasons are pipe-joined into one field.
        assert!(content.contains("Exact date match: 2024-03-05 | Event type match: markup"));
    }

    #[test]
    fn csv_field_quoting_rules() {
        let cases = [
            ("plain", "plain"),
            ("with,comma", "\"with,comma\""),
            ("with \"quote\"", "\"with \"\"quote\"\"\""),
            ("with\nnewline", "\"with\nnewline\""),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(csv_field(input), expected, "case '{input:?}'");
        }
    }

    #[test]
    fn json_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.json");
        let original = report();

        write_json_file(&original, &path).unwrap();
        let back: MatchReport = read_json_file(&path).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn read_missing_file_is_an_io_error() {
        let result: Result<MatchReport, _> = read_json_file(Path::new("/nonexistent/file.json"));
        assert!(matches!(result, Err(ReportError::Io { .. })));
    }
}
