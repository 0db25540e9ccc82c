use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chronicle_types::{Creator, ObjectId};

use crate::record::Diff;

/// An inclusive time window. A missing bound is open.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `at` lies inside the window.
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| *at >= start) && self.end.map_or(true, |end| *at <= end)
    }
}

/// Filter for diff lookups. Every criterion that is set must match.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffQuery {
    pub object_ids: Option<Vec<ObjectId>>,
    pub time_range: Option<TimeRange>,
    pub creator: Option<Creator>,
}

impl DiffQuery {
    /// A query matching every diff.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_objects<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ObjectId>,
    {
        self.object_ids = Some(ids.into_iter().collect());
        self
    }

    pub fn between(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.time_range = Some(TimeRange::new(start, end));
        self
    }

    pub fn by_creator(mut self, creator: Creator) -> Self {
        self.creator = Some(creator);
        self
    }

    /// Returns `true` if the given diff matches this query.
    pub fn matches(&self, diff: &Diff) -> bool {
        if let Some(ref ids) = self.object_ids {
            if !ids.contains(&diff.object_id) {
                return false;
            }
        }
        if let Some(ref range) = self.time_range {
            if !range.contains(&diff.timestamp) {
                return false;
            }
        }
        if let Some(ref creator) = self.creator {
            if *creator != diff.creator {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_diff::ChangeSet;
    use chronicle_types::Entity;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 6, 11, hour, 0, 0).unwrap()
    }

    fn diff(object: &str, user: &str, hour: u32) -> Diff {
        Diff::new(
            ChangeSet::new(),
            ObjectId::from(object),
            Entity::new("Order", "id"),
            Creator::new(user, "app"),
            at(hour),
        )
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(DiffQuery::new().matches(&diff("a", "u", 1)));
    }

    #[test]
    fn filters_by_object() {
        let query = DiffQuery::new().for_objects([ObjectId::from("a"), ObjectId::from("b")]);
        assert!(query.matches(&diff("a", "u", 1)));
        assert!(query.matches(&diff("b", "u", 1)));
        assert!(!query.matches(&diff("c", "u", 1)));
    }

    #[test]
    fn time_range_is_inclusive() {
        let query = DiffQuery::new().between(Some(at(2)), Some(at(4)));
        assert!(!query.matches(&diff("a", "u", 1)));
        assert!(query.matches(&diff("a", "u", 2)));
        assert!(query.matches(&diff("a", "u", 4)));
        assert!(!query.matches(&diff("a", "u", 5)));
    }

    #[test]
    fn open_ended_ranges() {
        let from = TimeRange::new(Some(at(3)), None);
        assert!(from.contains(&at(23)));
        assert!(!from.contains(&at(2)));

        let until = TimeRange::new(None, Some(at(3)));
        assert!(until.contains(&at(0)));
        assert!(!until.contains(&at(4)));
    }

    #[test]
    fn filters_by_creator() {
        let query = DiffQuery::new().by_creator(Creator::new("alice", "app"));
        assert!(query.matches(&diff("a", "alice", 1)));
        assert!(!query.matches(&diff("a", "bob", 1)));
    }

    #[test]
    fn criteria_combine() {
        let query = DiffQuery::new()
            .for_objects([ObjectId::from("a")])
            .by_creator(Creator::new("alice", "app"));
        assert!(query.matches(&diff("a", "alice", 1)));
        assert!(!query.matches(&diff("b", "alice", 1)));
        assert!(!query.matches(&diff("a", "bob", 1)));
    }
}
