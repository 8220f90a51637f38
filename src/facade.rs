use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::{classify, MemberBuckets};
use crate::error::{AggregateValidationError, InputError, RecordDiagnostic, ValidationError};
use crate::models::{Bucket, RawMember, RawPublication};
use crate::normalize::{normalize_member, normalize_publication};
use crate::window::{summarize, WindowSummary};

/// A result that is usable even when some records were reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub value: T,
    pub diagnostics: Vec<RecordDiagnostic>,
}

impl<T> Outcome<T> {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn warning(&self) -> Option<AggregateValidationError> {
        (!self.is_clean()).then(|| AggregateValidationError {
            diagnostics: self.diagnostics.clone(),
        })
    }

    pub fn into_parts(self) -> (T, Option<AggregateValidationError>) {
        let warning = (!self.diagnostics.is_empty()).then_some(AggregateValidationError {
            diagnostics: self.diagnostics,
        });
        (self.value, warning)
    }
}

fn normalize_batch<R, N>(
    raw: &[R],
    normalize: impl Fn(usize, &R) -> Result<N, ValidationError>,
    diagnostics: &mut Vec<RecordDiagnostic>,
) -> Vec<N> {
    let mut normalized = Vec::with_capacity(raw.len());

    for (position, record) in raw.iter().enumerate() {
        match normalize(position, record) {
            Ok(record) => normalized.push(record),
            Err(err) => {
                warn!("record {position}: skipped: {err}");
                diagnostics.push(RecordDiagnostic::new(position, err));
            }
        }
    }

    normalized
}

/// Classifies a roster batch. Skipped and unrecognized members are reported
/// in the outcome's diagnostics, ordered by input position.
pub fn classify_members(raw: &[RawMember]) -> Outcome<MemberBuckets> {
    let mut diagnostics = Vec::new();
    let members = normalize_batch(raw, normalize_member, &mut diagnostics);
    let classification = classify(members);

    diagnostics.extend(classification.warnings);
    diagnostics.sort_by_key(|diagnostic| diagnostic.position);

    info!(
        "roster: {} of {} members bucketed, {} reported",
        classification.buckets.len(),
        raw.len(),
        diagnostics.len()
    );

    Outcome {
        value: classification.buckets,
        diagnostics,
    }
}

/// Rolls a publication batch up into the rolling windows ending at `now`.
pub fn summarize_publications(raw: &[RawPublication], now: DateTime<Utc>) -> Outcome<WindowSummary> {
    let mut diagnostics = Vec::new();
    let publications = normalize_batch(raw, normalize_publication, &mut diagnostics);
    let summary = summarize(&publications, now);

    diagnostics.extend(summary.malformed);
    diagnostics.sort_by_key(|diagnostic| diagnostic.position);

    info!(
        "publications: {} of {} records summarized, {} reported",
        publications.len(),
        raw.len(),
        diagnostics.len()
    );

    Outcome {
        value: summary.windows,
        diagnostics,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Splits a JSON batch into records. A non-array batch is fatal; an element
/// that does not have the record shape becomes a diagnostic and is replaced
/// by `None` so positions stay aligned with the input.
fn deserialize_batch<R: DeserializeOwned>(
    value: &Value,
    diagnostics: &mut Vec<RecordDiagnostic>,
) -> Result<Vec<Option<R>>, InputError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Err(InputError::Null),
        other => {
            return Err(InputError::NotAnArray {
                found: value_kind(other),
            })
        }
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(position, item)| match <R as Deserialize>::deserialize(item) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("record {position}: skipped: {err}");
                diagnostics.push(RecordDiagnostic::new(
                    position,
                    ValidationError::Shape {
                        reason: err.to_string(),
                    },
                ));
                None
            }
        })
        .collect())
}

// Positions in `outcome` index the well-shaped subset; map them back.
fn merge_outcome<T>(
    mut outcome: Outcome<T>,
    kept_positions: &[usize],
    mut shape_diagnostics: Vec<RecordDiagnostic>,
) -> Outcome<T> {
    for diagnostic in &mut outcome.diagnostics {
        diagnostic.position = kept_positions[diagnostic.position];
    }
    outcome.diagnostics.append(&mut shape_diagnostics);
    outcome.diagnostics.sort_by_key(|diagnostic| diagnostic.position);
    outcome
}

fn split_batch<R>(records: Vec<Option<R>>) -> (Vec<usize>, Vec<R>) {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| record.map(|record| (position, record)))
        .unzip()
}

fn restore_member_positions(buckets: &mut MemberBuckets, kept_positions: &[usize]) {
    for bucket in Bucket::ALL {
        for member in buckets.get_mut(bucket) {
            member.position = kept_positions[member.position];
        }
    }
}

pub(crate) fn classify_member_rows(
    records: Vec<Option<RawMember>>,
    shape_diagnostics: Vec<RecordDiagnostic>,
) -> Outcome<MemberBuckets> {
    let (kept_positions, raw) = split_batch(records);

    let mut outcome = classify_members(&raw);
    restore_member_positions(&mut outcome.value, &kept_positions);
    merge_outcome(outcome, &kept_positions, shape_diagnostics)
}

pub(crate) fn summarize_publication_rows(
    records: Vec<Option<RawPublication>>,
    shape_diagnostics: Vec<RecordDiagnostic>,
    now: DateTime<Utc>,
) -> Outcome<WindowSummary> {
    let (kept_positions, raw) = split_batch(records);

    let outcome = summarize_publications(&raw, now);
    merge_outcome(outcome, &kept_positions, shape_diagnostics)
}

/// [`classify_members`] over an untyped JSON batch.
pub fn classify_members_json(value: &Value) -> Result<Outcome<MemberBuckets>, InputError> {
    let mut shape_diagnostics = Vec::new();
    let records = deserialize_batch::<RawMember>(value, &mut shape_diagnostics)?;
    Ok(classify_member_rows(records, shape_diagnostics))
}

/// [`summarize_publications`] over an untyped JSON batch.
pub fn summarize_publications_json(
    value: &Value,
    now: DateTime<Utc>,
) -> Result<Outcome<WindowSummary>, InputError> {
    let mut shape_diagnostics = Vec::new();
    let records = deserialize_batch::<RawPublication>(value, &mut shape_diagnostics)?;
    Ok(summarize_publication_rows(records, shape_diagnostics, now))
}
