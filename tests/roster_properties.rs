use std::collections::HashMap;

use lab_roster_insights::{
    classify_members, filter, Bucket, MemberType, RawMember, SearchIndex,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const TYPE_LABELS: [&str; 8] = [
    "Director",
    "Professor",
    "PhD Candidate",
    "Master's Candidate",
    "Post Doc Candidate",
    "Staff Member",
    "Visiting Scholar",
    "",
];
const STATUSES: [Option<&str>; 4] = [Some("Active"), Some("Inactive"), Some("active"), None];
const ALUMNI: [Option<&str>; 3] = [Some("Valid"), Some("Invalid"), None];

fn random_member(rng: &mut StdRng, id: usize) -> RawMember {
    RawMember {
        first_name: Some(format!("Member{id}")),
        last_name: Some(["Lee", "Moreno", "Patel"][rng.gen_range(0..3)].to_string()),
        email: Some(format!("member{id}@lab.org")),
        member_type: Some(TYPE_LABELS[rng.gen_range(0..TYPE_LABELS.len())].to_string()),
        status: STATUSES[rng.gen_range(0..STATUSES.len())].map(str::to_string),
        alumni_status: ALUMNI[rng.gen_range(0..ALUMNI.len())].map(str::to_string),
        ..RawMember::default()
    }
}

fn membership(raw: &[RawMember]) -> HashMap<String, Bucket> {
    let outcome = classify_members(raw);
    let mut seen = HashMap::new();
    for bucket in Bucket::ALL {
        for member in outcome.value.get(bucket) {
            let previous = seen.insert(member.email.clone(), bucket);
            assert!(previous.is_none(), "{} is in two buckets", member.email);
        }
    }
    seen
}

#[test]
fn every_member_lands_in_at_most_one_bucket() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let raw: Vec<RawMember> = (0..40).map(|id| random_member(&mut rng, id)).collect();
        let outcome = classify_members(&raw);

        let bucketed = membership(&raw).len();
        assert_eq!(bucketed, outcome.value.len());
        assert!(bucketed <= raw.len());
    }
}

#[test]
fn valid_alumni_always_wins() {
    for label in TYPE_LABELS {
        for status in STATUSES {
            let raw = vec![RawMember {
                first_name: Some("Noor".to_string()),
                last_name: Some("Haddad".to_string()),
                email: Some("noor@lab.org".to_string()),
                member_type: Some(label.to_string()),
                status: status.map(str::to_string),
                alumni_status: Some("Valid".to_string()),
                ..RawMember::default()
            }];
            let outcome = classify_members(&raw);
            assert_eq!(outcome.value.alumni.len(), 1, "type {label:?} status {status:?}");
            assert_eq!(outcome.value.len(), 1);
            assert!(outcome.is_clean());
        }
    }
}

#[test]
fn reordering_input_keeps_membership_and_relative_order() {
    let mut rng = StdRng::seed_from_u64(11);
    let raw: Vec<RawMember> = (0..60).map(|id| random_member(&mut rng, id)).collect();
    let mut shuffled = raw.clone();
    shuffled.shuffle(&mut rng);

    assert_eq!(membership(&raw), membership(&shuffled));

    let outcome = classify_members(&shuffled);
    for bucket in Bucket::ALL {
        let positions: Vec<usize> = outcome
            .value
            .get(bucket)
            .iter()
            .map(|member| member.position)
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "bucket {bucket} reordered");
    }
}

#[test]
fn active_members_of_every_type_are_bucketed() {
    let raw: Vec<RawMember> = MemberType::ALL
        .iter()
        .enumerate()
        .map(|(id, kind)| RawMember {
            first_name: Some(format!("Member{id}")),
            last_name: Some("Lee".to_string()),
            email: Some(format!("member{id}@lab.org")),
            member_type: Some(kind.label().to_string()),
            status: Some("Active".to_string()),
            ..RawMember::default()
        })
        .collect();

    let outcome = classify_members(&raw);
    assert_eq!(outcome.value.len(), MemberType::ALL.len());
    assert!(outcome.value.alumni.is_empty());
}

#[test]
fn search_is_identity_for_empty_query_and_idempotent() {
    let mut rng = StdRng::seed_from_u64(23);
    let raw: Vec<RawMember> = (0..80).map(|id| random_member(&mut rng, id)).collect();
    let outcome = classify_members(&raw);

    for bucket in Bucket::ALL {
        let members = outcome.value.get(bucket);
        assert_eq!(filter(members, ""), members.to_vec());

        for query in ["lee", "MORENO", "member1", "phd", "zzz"] {
            let once = filter(members, query);
            assert_eq!(filter(&once, query), once);
        }
    }

    let index = SearchIndex::new(&outcome.value);
    for bucket in Bucket::ALL {
        let indexed: Vec<_> = index
            .filter(bucket, "patel")
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(indexed, filter(outcome.value.get(bucket), "patel"));
    }
}
