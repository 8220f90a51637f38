use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde_json::Value;

use crate::classify::MemberBuckets;
use crate::error::{LoadError, RecordDiagnostic, ValidationError};
use crate::facade::{
    classify_member_rows, classify_members_json, summarize_publication_rows,
    summarize_publications_json, Outcome,
};
use crate::models::{RawMember, RawPublication, RawSocialLink, RawTimestamp};
use crate::window::WindowSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Format::Json),
            Some("csv") => Ok(Format::Csv),
            _ => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

fn read_json(path: &Path) -> Result<Value, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Deserializes every CSV row on its own so one bad row only costs that row.
fn read_csv_rows<Row, R>(
    path: &Path,
    convert: impl Fn(Row) -> R,
    diagnostics: &mut Vec<RecordDiagnostic>,
) -> Result<Vec<Option<R>>, LoadError>
where
    Row: serde::de::DeserializeOwned,
{
    let csv_error = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;
    reader.headers().map_err(csv_error)?;

    let mut rows = Vec::new();
    for (position, result) in reader.deserialize::<Row>().enumerate() {
        match result {
            Ok(row) => rows.push(Some(convert(row))),
            Err(err) => {
                warn!("{} row {position}: skipped: {err}", path.display());
                diagnostics.push(RecordDiagnostic::new(
                    position,
                    ValidationError::Shape {
                        reason: err.to_string(),
                    },
                ));
                rows.push(None);
            }
        }
    }

    debug!("read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// `platform=url` pairs separated by `;`, as exported in the roster sheet.
fn parse_social_links(cell: Option<String>) -> Vec<RawSocialLink> {
    cell.as_deref()
        .unwrap_or_default()
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(platform, url)| RawSocialLink {
            platform: Some(platform.trim().to_string()),
            url: Some(url.trim().to_string()),
        })
        .collect()
}

pub fn load_members(path: &Path) -> Result<Outcome<MemberBuckets>, LoadError> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        #[serde(alias = "firstname")]
        first_name: Option<String>,
        #[serde(alias = "lastname")]
        last_name: Option<String>,
        email: Option<String>,
        #[serde(rename = "type")]
        member_type: Option<String>,
        status: Option<String>,
        alumni_status: Option<String>,
        #[serde(default)]
        photo: Option<String>,
        #[serde(default)]
        short_bio: Option<String>,
        #[serde(default)]
        designation: Option<String>,
        #[serde(default)]
        socialmedia: Option<String>,
    }

    match Format::from_path(path)? {
        Format::Json => Ok(classify_members_json(&read_json(path)?)?),
        Format::Csv => {
            let mut diagnostics = Vec::new();
            let rows = read_csv_rows(
                path,
                |row: CsvRow| RawMember {
                    first_name: row.first_name,
                    last_name: row.last_name,
                    email: row.email,
                    member_type: row.member_type,
                    status: row.status,
                    alumni_status: row.alumni_status,
                    photo: row.photo,
                    short_bio: row.short_bio,
                    designation: row.designation,
                    socialmedia: parse_social_links(row.socialmedia),
                },
                &mut diagnostics,
            )?;
            Ok(classify_member_rows(rows, diagnostics))
        }
    }
}

pub fn load_publications(
    path: &Path,
    now: DateTime<Utc>,
) -> Result<Outcome<WindowSummary>, LoadError> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        #[serde(rename = "type")]
        publication_type: Option<String>,
        timestamp: Option<String>,
        #[serde(default)]
        weight: Option<f64>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        authors: Option<String>,
        #[serde(default)]
        venue: Option<String>,
    }

    match Format::from_path(path)? {
        Format::Json => Ok(summarize_publications_json(&read_json(path)?, now)?),
        Format::Csv => {
            let mut diagnostics = Vec::new();
            let rows = read_csv_rows(
                path,
                |row: CsvRow| RawPublication {
                    publication_type: row.publication_type,
                    timestamp: row.timestamp.map(RawTimestamp::Text),
                    weight: row.weight,
                    title: row.title,
                    authors: row.authors,
                    venue: row.venue,
                },
                &mut diagnostics,
            )?;
            Ok(summarize_publication_rows(rows, diagnostics, now))
        }
    }
}
