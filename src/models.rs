use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Folds a label for comparison: trimmed, lower-cased, typographic
/// apostrophes replaced by ASCII ones.
fn fold_label(label: &str) -> String {
    label.trim().replace('\u{2019}', "'").to_lowercase()
}

/// Member roles recognized by the roster pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemberType {
    #[serde(rename = "Director")]
    Director,
    #[serde(rename = "Professor")]
    Professor,
    #[serde(rename = "PhD Candidate")]
    PhdCandidate,
    #[serde(rename = "Master's Candidate")]
    MastersCandidate,
    #[serde(rename = "Post Doc Candidate")]
    PostDocCandidate,
    #[serde(rename = "Staff Member")]
    StaffMember,
}

impl MemberType {
    pub const ALL: [MemberType; 6] = [
        MemberType::Director,
        MemberType::Professor,
        MemberType::PhdCandidate,
        MemberType::MastersCandidate,
        MemberType::PostDocCandidate,
        MemberType::StaffMember,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MemberType::Director => "Director",
            MemberType::Professor => "Professor",
            MemberType::PhdCandidate => "PhD Candidate",
            MemberType::MastersCandidate => "Master's Candidate",
            MemberType::PostDocCandidate => "Post Doc Candidate",
            MemberType::StaffMember => "Staff Member",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let folded = fold_label(label);
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().to_lowercase() == folded)
    }

    /// Bucket an active, non-alumni member of this type lands in.
    pub fn bucket(&self) -> Bucket {
        match self {
            MemberType::Director => Bucket::Director,
            MemberType::Professor => Bucket::Professor,
            MemberType::PhdCandidate => Bucket::Phd,
            MemberType::MastersCandidate => Bucket::Masters,
            MemberType::PostDocCandidate => Bucket::Postdoc,
            MemberType::StaffMember => Bucket::Staff,
        }
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mutually-exclusive display categories of the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Director,
    Professor,
    Phd,
    Masters,
    Postdoc,
    Staff,
    Alumni,
}

impl Bucket {
    pub const ALL: [Bucket; 7] = [
        Bucket::Director,
        Bucket::Professor,
        Bucket::Phd,
        Bucket::Masters,
        Bucket::Postdoc,
        Bucket::Staff,
        Bucket::Alumni,
    ];

    /// Key used in serialized output.
    pub fn key(&self) -> &'static str {
        match self {
            Bucket::Director => "director",
            Bucket::Professor => "professor",
            Bucket::Phd => "phd",
            Bucket::Masters => "masters",
            Bucket::Postdoc => "postdoc",
            Bucket::Staff => "staff",
            Bucket::Alumni => "alumni",
        }
    }

    /// Section heading shown above the bucket.
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Director => "Director",
            Bucket::Professor => "Professors",
            Bucket::Phd => "PhD Candidates",
            Bucket::Masters => "Master's Candidates",
            Bucket::Postdoc => "Post Doc Candidates",
            Bucket::Staff => "Staff Members",
            Bucket::Alumni => "Alumni",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let folded = fold_label(key);
        Self::ALL.into_iter().find(|bucket| bucket.key() == folded)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    Active,
    Inactive,
}

impl MemberStatus {
    /// Only an explicit "Active" counts as active; anything else, absent
    /// included, is inactive.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if fold_label(value) == "active" => MemberStatus::Active,
            _ => MemberStatus::Inactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlumniStatus {
    Valid,
    Invalid,
}

impl AlumniStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if fold_label(value) == "valid" => AlumniStatus::Valid,
            _ => AlumniStatus::Invalid,
        }
    }
}

/// Publication categories reported on the statistics page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PublicationType {
    #[serde(rename = "Conference Paper")]
    ConferencePaper,
    #[serde(rename = "Journal Paper")]
    JournalPaper,
    #[serde(rename = "Book/Chapter")]
    BookChapter,
    #[serde(rename = "Patent")]
    Patent,
    #[serde(rename = "Project")]
    Project,
}

impl PublicationType {
    pub const ALL: [PublicationType; 5] = [
        PublicationType::ConferencePaper,
        PublicationType::JournalPaper,
        PublicationType::BookChapter,
        PublicationType::Patent,
        PublicationType::Project,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PublicationType::ConferencePaper => "Conference Paper",
            PublicationType::JournalPaper => "Journal Paper",
            PublicationType::BookChapter => "Book/Chapter",
            PublicationType::Patent => "Patent",
            PublicationType::Project => "Project",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let folded = fold_label(label);
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().to_lowercase() == folded)
    }
}

impl fmt::Display for PublicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSocialLink {
    #[serde(default, alias = "name")]
    pub platform: Option<String>,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A member record as delivered by the data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMember {
    #[serde(default, alias = "firstname", alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastname", alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "type")]
    pub member_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "alumniStatus")]
    pub alumni_status: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default, alias = "shortBio")]
    pub short_bio: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default, alias = "socialMedia", deserialize_with = "null_as_empty")]
    pub socialmedia: Vec<RawSocialLink>,
}

/// Timestamps arrive either as text or as unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Unix(i64),
    Text(String),
}

/// A publication record as delivered by the data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPublication {
    #[serde(default, rename = "type")]
    pub publication_type: Option<String>,
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// Member type as far as normalization could tell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MemberKind {
    Recognized(MemberType),
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedMember {
    /// Index of the record in its input batch.
    pub position: usize,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: MemberKind,
    pub status: MemberStatus,
    pub alumni_status: AlumniStatus,
    pub photo: Option<String>,
    pub short_bio: Option<String>,
    pub designation: Option<String>,
    pub socialmedia: Vec<SocialLink>,
    #[serde(skip)]
    pub search_blob: String,
}

impl NormalizedMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PublicationTimestamp {
    Parsed(DateTime<Utc>),
    Malformed { raw: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPublication {
    pub position: usize,
    #[serde(rename = "type")]
    pub publication_type: PublicationType,
    pub timestamp: PublicationTimestamp,
    pub weight: f64,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub venue: Option<String>,
    #[serde(skip)]
    pub search_blob: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_type_labels_round_trip() {
        for kind in MemberType::ALL {
            assert_eq!(MemberType::from_label(kind.label()), Some(kind));
        }
        assert_eq!(
            MemberType::from_label("  master\u{2019}s candidate "),
            Some(MemberType::MastersCandidate)
        );
        assert_eq!(MemberType::from_label("Visiting Scholar"), None);
    }

    #[test]
    fn every_member_type_maps_to_a_non_alumni_bucket() {
        for kind in MemberType::ALL {
            assert_ne!(kind.bucket(), Bucket::Alumni);
        }
    }

    #[test]
    fn status_parsing_is_strict_about_active_and_valid() {
        assert_eq!(MemberStatus::parse(Some(" active ")), MemberStatus::Active);
        assert_eq!(MemberStatus::parse(Some("Retired")), MemberStatus::Inactive);
        assert_eq!(MemberStatus::parse(None), MemberStatus::Inactive);
        assert_eq!(AlumniStatus::parse(Some("Valid")), AlumniStatus::Valid);
        assert_eq!(AlumniStatus::parse(Some("pending")), AlumniStatus::Invalid);
        assert_eq!(AlumniStatus::parse(None), AlumniStatus::Invalid);
    }

    #[test]
    fn raw_member_accepts_site_field_spellings() {
        let raw: RawMember = serde_json::from_str(
            r#"{"firstname":"Avery","lastName":"Lee","email":"a@lab.org","type":"Professor",
                "alumniStatus":"Invalid","socialmedia":[{"name":"GitHub","link":"https://github.com/avery"}]}"#,
        )
        .unwrap();
        assert_eq!(raw.first_name.as_deref(), Some("Avery"));
        assert_eq!(raw.last_name.as_deref(), Some("Lee"));
        assert_eq!(raw.alumni_status.as_deref(), Some("Invalid"));
        assert_eq!(raw.socialmedia[0].platform.as_deref(), Some("GitHub"));
    }

    #[test]
    fn null_social_media_reads_as_empty() {
        let raw: RawMember = serde_json::from_str(
            r#"{"firstname":"Avery","lastname":"Lee","email":"a@lab.org","socialmedia":null}"#,
        )
        .unwrap();
        assert!(raw.socialmedia.is_empty());
    }

    #[test]
    fn raw_timestamp_accepts_text_and_unix_seconds() {
        let text: RawPublication =
            serde_json::from_str(r#"{"type":"Patent","timestamp":"2026-01-02"}"#).unwrap();
        assert_eq!(
            text.timestamp,
            Some(RawTimestamp::Text("2026-01-02".to_string()))
        );
        let unix: RawPublication =
            serde_json::from_str(r#"{"type":"Patent","timestamp":1767312000}"#).unwrap();
        assert_eq!(unix.timestamp, Some(RawTimestamp::Unix(1_767_312_000)));
    }
}
