//! Partition matcher output into ordered groups for rendering.
//!
//! Section order is canonical: name matches first, then province groups,
//! country groups, status groups, and combined-filter groups. Within a
//! section, groups appear in first-encounter order over the matched records,
//! and no record lands in more than one group.

use crate::classify::StatusFilter;
use crate::domain::CrossingRecord;
use crate::matcher::{ActiveFilters, MatchDimension, MatchSet};

/// Key describing why a group's records matched. Display values keep the
/// raw (unnormalized) record text for headers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupKey {
    /// Matched by crossing name; rendered without a header.
    Name,
    Province(String),
    Country(String),
    /// Keyed by the status text exactly as the scraper reports it.
    Status(String),
    /// AND-combination bucket; fields carry the active dimensions only.
    Combined {
        province: Option<String>,
        country: Option<String>,
        status: Option<StatusFilter>,
    },
    /// "todos": the full record set, ungrouped.
    All,
}

#[derive(Clone, Debug)]
pub struct MatchGroup {
    pub key: GroupKey,
    pub records: Vec<CrossingRecord>,
}

pub fn group(matches: MatchSet) -> Vec<MatchGroup> {
    match matches {
        MatchSet::All(records) => {
            if records.is_empty() {
                Vec::new()
            } else {
                vec![MatchGroup {
                    key: GroupKey::All,
                    records,
                }]
            }
        }
        MatchSet::Priority(items) => group_priority(items),
        MatchSet::Combined { active, records } => group_combined(active, records),
    }
}

fn group_priority(items: Vec<(MatchDimension, CrossingRecord)>) -> Vec<MatchGroup> {
    let mut by_name = Vec::new();
    let mut provinces: Vec<(String, Vec<CrossingRecord>)> = Vec::new();
    let mut countries: Vec<(String, Vec<CrossingRecord>)> = Vec::new();
    let mut statuses: Vec<(String, Vec<CrossingRecord>)> = Vec::new();

    for (dimension, record) in items {
        match dimension {
            MatchDimension::Name => by_name.push(record),
            MatchDimension::Province => push_keyed(&mut provinces, record.province.clone(), record),
            MatchDimension::Country => push_keyed(&mut countries, record.country.clone(), record),
            MatchDimension::Status => push_keyed(&mut statuses, record.status.clone(), record),
        }
    }

    let mut out = Vec::new();
    if !by_name.is_empty() {
        out.push(MatchGroup {
            key: GroupKey::Name,
            records: by_name,
        });
    }
    out.extend(provinces.into_iter().map(|(key, records)| MatchGroup {
        key: GroupKey::Province(key),
        records,
    }));
    out.extend(countries.into_iter().map(|(key, records)| MatchGroup {
        key: GroupKey::Country(key),
        records,
    }));
    out.extend(statuses.into_iter().map(|(key, records)| MatchGroup {
        key: GroupKey::Status(key),
        records,
    }));
    out
}

fn group_combined(active: ActiveFilters, records: Vec<CrossingRecord>) -> Vec<MatchGroup> {
    let mut buckets: Vec<(GroupKey, Vec<CrossingRecord>)> = Vec::new();

    for record in records {
        let key = GroupKey::Combined {
            province: active.province.then(|| record.province.clone()),
            country: active.country.then(|| record.country.clone()),
            status: active.status,
        };
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => bucket.push(record),
            None => buckets.push((key, vec![record])),
        }
    }

    buckets
        .into_iter()
        .map(|(key, records)| MatchGroup { key, records })
        .collect()
}

/// Insertion-order bucket map; record sets are small enough for linear scans.
fn push_keyed(
    buckets: &mut Vec<(String, Vec<CrossingRecord>)>,
    key: String,
    record: CrossingRecord,
) {
    match buckets.iter_mut().find(|(k, _)| *k == key) {
        Some((_, bucket)) => bucket.push(record),
        None => buckets.push((key, vec![record])),
    }
}
