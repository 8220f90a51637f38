use crate::classify::MemberBuckets;
use crate::models::{Bucket, NormalizedMember, NormalizedPublication};

/// Records that carry a pre-lowered search blob.
pub trait Searchable {
    fn search_blob(&self) -> &str;
}

impl Searchable for NormalizedMember {
    fn search_blob(&self) -> &str {
        &self.search_blob
    }
}

impl Searchable for NormalizedPublication {
    fn search_blob(&self) -> &str {
        &self.search_blob
    }
}

fn needle(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Returns the records whose blob contains `query`, in their original order.
/// The query is trimmed before matching; a blank query returns the bucket
/// unchanged.
pub fn filter<T: Searchable + Clone>(bucket: &[T], query: &str) -> Vec<T> {
    match needle(query) {
        Some(needle) => bucket
            .iter()
            .filter(|record| record.search_blob().contains(&needle))
            .cloned()
            .collect(),
        None => bucket.to_vec(),
    }
}

/// Per-bucket view over a classified roster so a query only scans the
/// bucket it targets.
#[derive(Debug)]
pub struct SearchIndex<'a> {
    buckets: &'a MemberBuckets,
    blobs: Vec<(Bucket, Vec<&'a str>)>,
}

impl<'a> SearchIndex<'a> {
    pub fn new(buckets: &'a MemberBuckets) -> Self {
        let blobs = Bucket::ALL
            .into_iter()
            .map(|bucket| {
                let view = buckets
                    .get(bucket)
                    .iter()
                    .map(|member| member.search_blob())
                    .collect();
                (bucket, view)
            })
            .collect();

        Self { buckets, blobs }
    }

    fn view(&self, bucket: Bucket) -> &[&'a str] {
        self.blobs
            .iter()
            .find(|(candidate, _)| *candidate == bucket)
            .map(|(_, view)| view.as_slice())
            .unwrap_or(&[])
    }

    /// Members of `bucket` matching `query`, in bucket order.
    pub fn filter(&self, bucket: Bucket, query: &str) -> Vec<&'a NormalizedMember> {
        let members = self.buckets.get(bucket);
        let Some(needle) = needle(query) else {
            return members.iter().collect();
        };

        self.view(bucket)
            .iter()
            .zip(members)
            .filter(|(blob, _)| blob.contains(&needle))
            .map(|(_, member)| member)
            .collect()
    }

    pub fn filter_all(&self, query: &str) -> MemberBuckets {
        let mut filtered = MemberBuckets::default();
        for bucket in Bucket::ALL {
            *filtered.get_mut(bucket) = self
                .filter(bucket, query)
                .into_iter()
                .cloned()
                .collect();
        }
        filtered
    }
}
