use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::warn;

use crate::error::{MalformedTimestampError, ValidationError};
use crate::models::{
    AlumniStatus, MemberKind, MemberStatus, MemberType, NormalizedMember, NormalizedPublication,
    PublicationTimestamp, PublicationType, RawMember, RawPublication, RawTimestamp, SocialLink,
};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, ValidationError> {
    clean(value).ok_or(ValidationError::MissingField { field })
}

fn search_blob<'a>(fields: impl IntoIterator<Item = Option<&'a str>>) -> String {
    fields
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Keeps the first link per platform (case-insensitive) and drops blank entries.
fn unique_social_links(position: usize, raw: &RawMember) -> Vec<SocialLink> {
    let mut links: Vec<SocialLink> = Vec::new();

    for entry in &raw.socialmedia {
        let (Some(platform), Some(url)) = (
            clean(entry.platform.as_deref()),
            clean(entry.url.as_deref()),
        ) else {
            continue;
        };

        if links
            .iter()
            .any(|link| link.platform.eq_ignore_ascii_case(&platform))
        {
            warn!("record {position}: duplicate social platform `{platform}` dropped");
            continue;
        }

        links.push(SocialLink { platform, url });
    }

    links
}

pub fn normalize_member(
    position: usize,
    raw: &RawMember,
) -> Result<NormalizedMember, ValidationError> {
    let first_name = required(raw.first_name.as_deref(), "first_name")?;
    let last_name = required(raw.last_name.as_deref(), "last_name")?;
    let email = required(raw.email.as_deref(), "email")?;

    let type_label = clean(raw.member_type.as_deref()).unwrap_or_default();
    let kind = match MemberType::from_label(&type_label) {
        Some(kind) => MemberKind::Recognized(kind),
        None => MemberKind::Unrecognized(type_label),
    };

    let designation = clean(raw.designation.as_deref());
    let short_bio = clean(raw.short_bio.as_deref());
    let kind_label = match &kind {
        MemberKind::Recognized(kind) => kind.label(),
        MemberKind::Unrecognized(label) => label.as_str(),
    };
    let search_blob = search_blob([
        Some(first_name.as_str()),
        Some(last_name.as_str()),
        Some(email.as_str()),
        Some(kind_label).filter(|label| !label.is_empty()),
        designation.as_deref(),
        short_bio.as_deref(),
    ]);

    Ok(NormalizedMember {
        position,
        socialmedia: unique_social_links(position, raw),
        status: MemberStatus::parse(raw.status.as_deref()),
        alumni_status: AlumniStatus::parse(raw.alumni_status.as_deref()),
        photo: clean(raw.photo.as_deref()),
        first_name,
        last_name,
        email,
        kind,
        short_bio,
        designation,
        search_blob,
    })
}

pub fn parse_timestamp(raw: &RawTimestamp) -> Result<DateTime<Utc>, MalformedTimestampError> {
    let text = match raw {
        RawTimestamp::Unix(seconds) => {
            return DateTime::from_timestamp(*seconds, 0).ok_or_else(|| MalformedTimestampError {
                raw: seconds.to_string(),
            });
        }
        RawTimestamp::Text(text) => text.trim(),
    };

    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Ok(at.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| MalformedTimestampError {
            raw: text.to_string(),
        })
}

/// Normalizes a publication. An unparseable timestamp is not fatal: it is
/// carried as [`PublicationTimestamp::Malformed`] so the record still
/// counts towards the overall totals.
pub fn normalize_publication(
    position: usize,
    raw: &RawPublication,
) -> Result<NormalizedPublication, ValidationError> {
    let type_label = required(raw.publication_type.as_deref(), "type")?;
    let publication_type = PublicationType::from_label(&type_label)
        .ok_or(ValidationError::UnknownPublicationType { label: type_label })?;

    let raw_timestamp = match &raw.timestamp {
        Some(RawTimestamp::Text(text)) if text.trim().is_empty() => None,
        other => other.as_ref(),
    }
    .ok_or(ValidationError::MissingField { field: "timestamp" })?;

    let timestamp = match parse_timestamp(raw_timestamp) {
        Ok(at) => PublicationTimestamp::Parsed(at),
        Err(MalformedTimestampError { raw }) => PublicationTimestamp::Malformed { raw },
    };

    let weight = raw.weight.unwrap_or(1.0);
    if !weight.is_finite() || weight < 0.0 {
        return Err(ValidationError::InvalidWeight {
            weight: weight.to_string(),
        });
    }

    let title = clean(raw.title.as_deref());
    let authors = clean(raw.authors.as_deref());
    let venue = clean(raw.venue.as_deref());
    let search_blob = search_blob([
        Some(publication_type.label()),
        title.as_deref(),
        authors.as_deref(),
        venue.as_deref(),
    ]);

    Ok(NormalizedPublication {
        position,
        publication_type,
        timestamp,
        weight,
        title,
        authors,
        venue,
        search_blob,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawSocialLink;
    use chrono::TimeZone;

    fn raw_member() -> RawMember {
        RawMember {
            first_name: Some("  Avery ".to_string()),
            last_name: Some("Lee".to_string()),
            email: Some("Avery.Lee@lab.org".to_string()),
            member_type: Some("PhD Candidate".to_string()),
            status: Some("Active".to_string()),
            designation: Some("Graph Learning".to_string()),
            ..RawMember::default()
        }
    }

    fn social(platform: &str, url: &str) -> RawSocialLink {
        RawSocialLink {
            platform: Some(platform.to_string()),
            url: Some(url.to_string()),
        }
    }

    #[test]
    fn trims_display_fields_and_lowercases_blob() {
        let member = normalize_member(0, &raw_member()).unwrap();
        assert_eq!(member.first_name, "Avery");
        assert_eq!(member.email, "Avery.Lee@lab.org");
        assert_eq!(member.kind, MemberKind::Recognized(MemberType::PhdCandidate));
        assert_eq!(
            member.search_blob,
            "avery lee avery.lee@lab.org phd candidate graph learning"
        );
    }

    #[test]
    fn rejects_blank_identity_fields() {
        let mut raw = raw_member();
        raw.email = Some("   ".to_string());
        assert_eq!(
            normalize_member(0, &raw),
            Err(ValidationError::MissingField { field: "email" })
        );

        raw.first_name = None;
        assert_eq!(
            normalize_member(0, &raw),
            Err(ValidationError::MissingField {
                field: "first_name"
            })
        );
    }

    #[test]
    fn keeps_unrecognized_type_for_the_classifier() {
        let mut raw = raw_member();
        raw.member_type = Some("Visiting Scholar".to_string());
        let member = normalize_member(3, &raw).unwrap();
        assert_eq!(
            member.kind,
            MemberKind::Unrecognized("Visiting Scholar".to_string())
        );
        assert_eq!(member.position, 3);
    }

    #[test]
    fn deduplicates_social_platforms_keeping_first() {
        let mut raw = raw_member();
        raw.socialmedia = vec![
            social("GitHub", "https://github.com/avery"),
            social("LinkedIn", " "),
            social("github", "https://github.com/other"),
            social("Scholar", "https://scholar.example/avery"),
        ];
        let member = normalize_member(0, &raw).unwrap();
        let platforms: Vec<&str> = member
            .socialmedia
            .iter()
            .map(|link| link.platform.as_str())
            .collect();
        assert_eq!(platforms, vec!["GitHub", "Scholar"]);
        assert_eq!(member.socialmedia[0].url, "https://github.com/avery");
    }

    #[test]
    fn parses_supported_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let text = |value: &str| RawTimestamp::Text(value.to_string());

        assert_eq!(parse_timestamp(&text("2026-03-14T09:30:00Z")), Ok(expected));
        assert_eq!(
            parse_timestamp(&text("2026-03-14T11:30:00+02:00")),
            Ok(expected)
        );
        assert_eq!(parse_timestamp(&text("2026-03-14 09:30:00")), Ok(expected));
        assert_eq!(parse_timestamp(&text("2026-03-14T09:30:00.000")), Ok(expected));
        assert_eq!(
            parse_timestamp(&text("2026-03-14")),
            Ok(Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp(&RawTimestamp::Unix(expected.timestamp())),
            Ok(expected)
        );
        assert!(parse_timestamp(&text("last tuesday")).is_err());
    }

    #[test]
    fn malformed_timestamp_is_carried_not_rejected() {
        let raw = RawPublication {
            publication_type: Some("Patent".to_string()),
            timestamp: Some(RawTimestamp::Text("14/03/2026".to_string())),
            ..RawPublication::default()
        };
        let publication = normalize_publication(0, &raw).unwrap();
        assert_eq!(
            publication.timestamp,
            PublicationTimestamp::Malformed {
                raw: "14/03/2026".to_string()
            }
        );
        assert_eq!(publication.weight, 1.0);
    }

    #[test]
    fn publication_requires_known_type_and_timestamp() {
        let missing_type = RawPublication {
            timestamp: Some(RawTimestamp::Text("2026-01-01".to_string())),
            ..RawPublication::default()
        };
        assert_eq!(
            normalize_publication(0, &missing_type),
            Err(ValidationError::MissingField { field: "type" })
        );

        let unknown_type = RawPublication {
            publication_type: Some("Poster".to_string()),
            ..missing_type.clone()
        };
        assert_eq!(
            normalize_publication(0, &unknown_type),
            Err(ValidationError::UnknownPublicationType {
                label: "Poster".to_string()
            })
        );

        let blank_timestamp = RawPublication {
            publication_type: Some("Journal Paper".to_string()),
            timestamp: Some(RawTimestamp::Text("  ".to_string())),
            ..RawPublication::default()
        };
        assert_eq!(
            normalize_publication(0, &blank_timestamp),
            Err(ValidationError::MissingField { field: "timestamp" })
        );
    }

    #[test]
    fn rejects_negative_weights_and_keeps_fractions() {
        let mut raw = RawPublication {
            publication_type: Some("Book/Chapter".to_string()),
            timestamp: Some(RawTimestamp::Text("2026-01-01".to_string())),
            weight: Some(0.33),
            title: Some("Graph Kernels".to_string()),
            ..RawPublication::default()
        };
        let publication = normalize_publication(0, &raw).unwrap();
        assert_eq!(publication.weight, 0.33);
        assert_eq!(publication.search_blob, "book/chapter graph kernels");

        raw.weight = Some(-1.0);
        assert!(matches!(
            normalize_publication(0, &raw),
            Err(ValidationError::InvalidWeight { .. })
        ));
    }
}
