pub mod classify;
pub mod error;
pub mod facade;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod report;
pub mod search;
pub mod window;

pub use classify::{classify, Classification, MemberBuckets, Placement};
pub use error::{
    AggregateValidationError, InputError, LoadError, MalformedTimestampError, RecordDiagnostic,
    RecordIssue, ValidationError,
};
pub use facade::{
    classify_members, classify_members_json, summarize_publications, summarize_publications_json,
    Outcome,
};
pub use models::{
    AlumniStatus, Bucket, MemberKind, MemberStatus, MemberType, NormalizedMember,
    NormalizedPublication, PublicationTimestamp, PublicationType, RawMember, RawPublication,
    RawSocialLink, RawTimestamp, SocialLink,
};
pub use search::{filter, SearchIndex, Searchable};
pub use window::{summarize, PublicationSummary, TypeTotals, Window, WindowSummary};
