//! Multi-criteria record selection.
//!
//! Two modes, decided per query against the actual record set:
//!
//! * at most one filter dimension active: priority branching, name >
//!   province > country > status, each record captured by the first
//!   dimension it satisfies;
//! * two or more dimensions active (or "todos" combined with another
//!   filter): AND-combination, a record qualifies only if every active
//!   dimension holds.
//!
//! Country matching is exact equality on the normalized text; province and
//! name matching are substring containment.

use crate::classify::{Query, StatusFilter};
use crate::domain::CrossingRecord;
use crate::normalize::normalize;

/// Dimension that captured a record in priority-branching mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchDimension {
    Name,
    Province,
    Country,
    Status,
}

/// Filter dimensions active for an AND-combination pass. Name containment is
/// the head of the priority chain and never part of the AND set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    pub status: Option<StatusFilter>,
    pub province: bool,
    pub country: bool,
}

impl ActiveFilters {
    pub fn count(&self) -> usize {
        usize::from(self.status.is_some())
            + usize::from(self.province)
            + usize::from(self.country)
    }
}

/// Matcher output. Record order always follows the input snapshot order.
#[derive(Clone, Debug)]
pub enum MatchSet {
    /// Priority branching: each record tagged with the dimension that took it.
    Priority(Vec<(MatchDimension, CrossingRecord)>),
    /// AND-combination across the recorded active dimensions.
    Combined {
        active: ActiveFilters,
        records: Vec<CrossingRecord>,
    },
    /// "todos" with no other filter: the whole snapshot, unfiltered.
    All(Vec<CrossingRecord>),
}

impl MatchSet {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        match self {
            MatchSet::Priority(items) => items.len(),
            MatchSet::Combined { records, .. } => records.len(),
            MatchSet::All(records) => records.len(),
        }
    }
}

/// Record fields normalized once per record before any comparison.
struct NormalizedFields {
    name: String,
    province: String,
    country: String,
    status: String,
}

fn normalized_fields(record: &CrossingRecord) -> NormalizedFields {
    NormalizedFields {
        name: normalize(&record.name),
        province: normalize(&record.province),
        country: normalize(&record.country),
        status: normalize(&record.status),
    }
}

#[inline]
fn name_matches(query: &Query, fields: &NormalizedFields) -> bool {
    fields.name.contains(&query.normalized_text)
        || query.name_tokens.iter().any(|t| fields.name.contains(t.as_str()))
}

#[inline]
fn province_matches(query: &Query, fields: &NormalizedFields) -> bool {
    fields.province.contains(&query.normalized_text)
        || query
            .name_tokens
            .iter()
            .any(|t| fields.province.contains(t.as_str()))
}

/// Country names are short, so substring matching produced false positives;
/// only the whole query or a whole token may equal the country.
#[inline]
fn country_matches(query: &Query, fields: &NormalizedFields) -> bool {
    !fields.country.is_empty()
        && (fields.country == query.normalized_text
            || query.name_tokens.iter().any(|t| t == &fields.country))
}

#[inline]
fn status_matches(filter: StatusFilter, fields: &NormalizedFields) -> bool {
    filter.matches(&fields.status)
}

/// Select the records a query is asking about.
pub fn select(query: &Query, records: Vec<CrossingRecord>) -> MatchSet {
    let fields: Vec<NormalizedFields> = records.iter().map(normalized_fields).collect();

    let active = ActiveFilters {
        status: query.status_filter,
        province: fields.iter().any(|f| province_matches(query, f)),
        country: fields.iter().any(|f| country_matches(query, f)),
    };

    if query.wants_all {
        if active.count() == 0 {
            return MatchSet::All(records);
        }
        return combined(query, records, &fields, active);
    }

    if active.count() > 1 {
        return combined(query, records, &fields, active);
    }

    let mut out = Vec::new();
    for (record, f) in records.into_iter().zip(&fields) {
        let dimension = if name_matches(query, f) {
            MatchDimension::Name
        } else if province_matches(query, f) {
            MatchDimension::Province
        } else if country_matches(query, f) {
            MatchDimension::Country
        } else if query.status_filter.is_some_and(|s| status_matches(s, f)) {
            MatchDimension::Status
        } else {
            continue;
        };
        out.push((dimension, record));
    }
    MatchSet::Priority(out)
}

fn combined(
    query: &Query,
    records: Vec<CrossingRecord>,
    fields: &[NormalizedFields],
    active: ActiveFilters,
) -> MatchSet {
    let mut out = Vec::new();
    for (record, f) in records.into_iter().zip(fields) {
        if active.status.is_some_and(|s| !status_matches(s, f)) {
            continue;
        }
        if active.province && !province_matches(query, f) {
            continue;
        }
        if active.country && !country_matches(query, f) {
            continue;
        }
        out.push(record);
    }
    MatchSet::Combined {
        active,
        records: out,
    }
}
