use log::{debug, warn};
use serde::Serialize;

use crate::error::{RecordDiagnostic, RecordIssue};
use crate::models::{AlumniStatus, Bucket, MemberKind, MemberStatus, NormalizedMember};

/// Where the precedence rules put a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Bucket(Bucket),
    Inactive,
    UnrecognizedType,
}

/// Applies the roster precedence rules, first match wins:
/// a valid alumni status, then an inactive status, then the member type.
pub fn placement(member: &NormalizedMember) -> Placement {
    if member.alumni_status == AlumniStatus::Valid {
        return Placement::Bucket(Bucket::Alumni);
    }

    if member.status != MemberStatus::Active {
        return Placement::Inactive;
    }

    match &member.kind {
        MemberKind::Recognized(kind) => Placement::Bucket(kind.bucket()),
        MemberKind::Unrecognized(_) => Placement::UnrecognizedType,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberBuckets {
    pub director: Vec<NormalizedMember>,
    pub professor: Vec<NormalizedMember>,
    pub phd: Vec<NormalizedMember>,
    pub masters: Vec<NormalizedMember>,
    pub postdoc: Vec<NormalizedMember>,
    pub staff: Vec<NormalizedMember>,
    pub alumni: Vec<NormalizedMember>,
}

impl MemberBuckets {
    pub fn get(&self, bucket: Bucket) -> &[NormalizedMember] {
        match bucket {
            Bucket::Director => &self.director,
            Bucket::Professor => &self.professor,
            Bucket::Phd => &self.phd,
            Bucket::Masters => &self.masters,
            Bucket::Postdoc => &self.postdoc,
            Bucket::Staff => &self.staff,
            Bucket::Alumni => &self.alumni,
        }
    }

    pub(crate) fn get_mut(&mut self, bucket: Bucket) -> &mut Vec<NormalizedMember> {
        match bucket {
            Bucket::Director => &mut self.director,
            Bucket::Professor => &mut self.professor,
            Bucket::Phd => &mut self.phd,
            Bucket::Masters => &mut self.masters,
            Bucket::Postdoc => &mut self.postdoc,
            Bucket::Staff => &mut self.staff,
            Bucket::Alumni => &mut self.alumni,
        }
    }

    /// Total number of bucketed members.
    pub fn len(&self) -> usize {
        Bucket::ALL.iter().map(|bucket| self.get(*bucket).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn counts(&self) -> Vec<(Bucket, usize)> {
        Bucket::ALL
            .into_iter()
            .map(|bucket| (bucket, self.get(bucket).len()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub buckets: MemberBuckets,
    /// Soft warnings for members excluded because of an unrecognized type.
    pub warnings: Vec<RecordDiagnostic>,
}

/// Partitions members into display buckets, preserving input order within
/// each bucket. Inactive members are dropped silently.
pub fn classify(members: impl IntoIterator<Item = NormalizedMember>) -> Classification {
    let mut classification = Classification::default();
    let mut inactive = 0usize;

    for member in members {
        match placement(&member) {
            Placement::Bucket(bucket) => classification.buckets.get_mut(bucket).push(member),
            Placement::Inactive => inactive += 1,
            Placement::UnrecognizedType => {
                let label = match member.kind {
                    MemberKind::Unrecognized(label) => label,
                    MemberKind::Recognized(kind) => kind.label().to_string(),
                };
                warn!(
                    "record {}: unrecognized member type `{}`, excluded from roster",
                    member.position, label
                );
                classification.warnings.push(RecordDiagnostic::new(
                    member.position,
                    RecordIssue::UnrecognizedMemberType { label },
                ));
            }
        }
    }

    debug!(
        "classified {} members ({} inactive, {} unrecognized)",
        classification.buckets.len(),
        inactive,
        classification.warnings.len()
    );

    classification
}
