use std::collections::HashMap;

use chrono::NaiveDate;

use crate::dates::days_in_range;
use crate::store::types::AvailabilityStatus;

/// Materialized availability snapshot the engine scores over:
/// participant id -> (date -> status). Missing entries mean `Unknown`.
pub type AvailabilityMap = HashMap<String, HashMap<NaiveDate, AvailabilityStatus>>;

/// Score weights per status. Unavailable and unknown contribute nothing.
pub const AVAILABLE_WEIGHT: u32 = 2;
pub const MAYBE_WEIGHT: u32 = 1;

/// Aggregated counts and score for one candidate day.
/// Derived per query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayScore {
    pub date: NaiveDate,
    pub score: u32,
    pub available: u32,
    pub maybe: u32,
    pub unavailable: u32,
}

/// Per-participant response counts over a date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantTally {
    pub id: String,
    pub available: u32,
    pub maybe: u32,
}

/// Look up one participant's status for one day, defaulting to `Unknown`.
/// Both ranking operations count through this single primitive.
pub fn status_for(availability: &AvailabilityMap, id: &str, date: NaiveDate) -> AvailabilityStatus {
    availability
        .get(id)
        .and_then(|days| days.get(&date))
        .copied()
        .unwrap_or_default()
}

/// Rank the days of the inclusive range `start..=end`, best first.
///
/// Each day in the range produces exactly one entry. A day's score is
/// `2 * available + 1 * maybe`; entries are sorted score-descending with
/// ties broken by ascending date. Participants with no record for a day
/// (status unknown) are counted in none of the three tallies, so a group
/// that hasn't answered yet scores every day at zero rather than looking
/// unavailable.
///
/// An inverted range yields an empty vector; an empty participant list
/// yields all-zero scores for every day. Neither is an error.
pub fn compute_best_days(
    start: NaiveDate,
    end: NaiveDate,
    participant_ids: &[String],
    availability: &AvailabilityMap,
) -> Vec<DayScore> {
    let mut days: Vec<DayScore> = days_in_range(start, end)
        .into_iter()
        .map(|date| {
            let mut day = DayScore {
                date,
                score: 0,
                available: 0,
                maybe: 0,
                unavailable: 0,
            };
            for id in participant_ids {
                match status_for(availability, id, date) {
                    AvailabilityStatus::Available => day.available += 1,
                    AvailabilityStatus::Maybe => day.maybe += 1,
                    AvailabilityStatus::Unavailable => day.unavailable += 1,
                    AvailabilityStatus::Unknown => {}
                }
            }
            day.score = AVAILABLE_WEIGHT * day.available + MAYBE_WEIGHT * day.maybe;
            day
        })
        .collect();

    days.sort_by(|a, b| b.score.cmp(&a.score).then(a.date.cmp(&b.date)));
    days
}

/// Rank participants by how often they can make it in `start..=end`.
///
/// Sorted descending by available-day count, ties broken descending by
/// maybe-day count; further ties preserve the input order of
/// `participant_ids` (stable sort).
pub fn rank_participants(
    start: NaiveDate,
    end: NaiveDate,
    participant_ids: &[String],
    availability: &AvailabilityMap,
) -> Vec<ParticipantTally> {
    let days = days_in_range(start, end);

    let mut tallies: Vec<ParticipantTally> = participant_ids
        .iter()
        .map(|id| {
            let mut tally = ParticipantTally {
                id: id.clone(),
                available: 0,
                maybe: 0,
            };
            for &date in &days {
                match status_for(availability, id, date) {
                    AvailabilityStatus::Available => tally.available += 1,
                    AvailabilityStatus::Maybe => tally.maybe += 1,
                    _ => {}
                }
            }
            tally
        })
        .collect();

    tallies.sort_by(|a, b| b.available.cmp(&a.available).then(b.maybe.cmp(&a.maybe)));
    tallies
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// p1 = {03-01: available, 03-02: maybe}
    /// p2 = {03-01: available, 03-03: unavailable}
    fn scenario_availability() -> AvailabilityMap {
        let mut map = AvailabilityMap::new();
        map.insert(
            "p1".to_string(),
            HashMap::from([
                (d(2024, 3, 1), AvailabilityStatus::Available),
                (d(2024, 3, 2), AvailabilityStatus::Maybe),
            ]),
        );
        map.insert(
            "p2".to_string(),
            HashMap::from([
                (d(2024, 3, 1), AvailabilityStatus::Available),
                (d(2024, 3, 3), AvailabilityStatus::Unavailable),
            ]),
        );
        map
    }

    #[test]
    fn test_two_players_three_days() {
        let result = compute_best_days(
            d(2024, 3, 1),
            d(2024, 3, 3),
            &ids(&["p1", "p2"]),
            &scenario_availability(),
        );

        assert_eq!(result.len(), 3);

        assert_eq!(result[0].date, d(2024, 3, 1));
        assert_eq!(result[0].score, 4);
        assert_eq!(result[0].available, 2);

        assert_eq!(result[1].date, d(2024, 3, 2));
        assert_eq!(result[1].score, 1);
        assert_eq!(result[1].maybe, 1);

        assert_eq!(result[2].date, d(2024, 3, 3));
        assert_eq!(result[2].score, 0);
        assert_eq!(result[2].unavailable, 1);
    }

    #[test]
    fn test_one_entry_per_day_all_in_range() {
        let start = d(2024, 3, 1);
        let end = d(2024, 3, 10);
        let result = compute_best_days(start, end, &ids(&["p1", "p2"]), &scenario_availability());

        assert_eq!(result.len(), 10);
        let mut dates: Vec<NaiveDate> = result.iter().map(|day| day.date).collect();
        dates.sort();
        dates.dedup();
        assert_eq!(dates.len(), 10);
        assert!(dates.iter().all(|date| *date >= start && *date <= end));
    }

    #[test]
    fn test_score_formula_and_count_bound() {
        let participants = ids(&["p1", "p2"]);
        let result = compute_best_days(
            d(2024, 3, 1),
            d(2024, 3, 5),
            &participants,
            &scenario_availability(),
        );
        for day in &result {
            assert_eq!(day.score, 2 * day.available + day.maybe);
            assert!(day.available + day.maybe + day.unavailable <= participants.len() as u32);
        }
    }

    #[test]
    fn test_sorted_score_descending_ties_by_date() {
        let result = compute_best_days(
            d(2024, 3, 1),
            d(2024, 3, 10),
            &ids(&["p1", "p2"]),
            &scenario_availability(),
        );
        for pair in result.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                assert!(pair[0].date < pair[1].date);
            }
        }
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let result = compute_best_days(
            d(2024, 3, 3),
            d(2024, 3, 1),
            &ids(&["p1"]),
            &scenario_availability(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_participants_all_zero() {
        let result =
            compute_best_days(d(2024, 3, 1), d(2024, 3, 3), &[], &scenario_availability());
        assert_eq!(result.len(), 3);
        for day in &result {
            assert_eq!(day.score, 0);
            assert_eq!(day.available + day.maybe + day.unavailable, 0);
        }
        // All-zero scores keep date order
        assert_eq!(result[0].date, d(2024, 3, 1));
        assert_eq!(result[2].date, d(2024, 3, 3));
    }

    #[test]
    fn test_unanswered_participant_counts_nowhere() {
        // "ghost" never responded: contributes to none of the tallies
        let with_ghost = compute_best_days(
            d(2024, 3, 1),
            d(2024, 3, 3),
            &ids(&["p1", "p2", "ghost"]),
            &scenario_availability(),
        );
        let without = compute_best_days(
            d(2024, 3, 1),
            d(2024, 3, 3),
            &ids(&["p1", "p2"]),
            &scenario_availability(),
        );
        assert_eq!(with_ghost, without);
    }

    #[test]
    fn test_pure_and_idempotent() {
        let participants = ids(&["p1", "p2"]);
        let availability = scenario_availability();
        let first = compute_best_days(d(2024, 3, 1), d(2024, 3, 3), &participants, &availability);
        let second = compute_best_days(d(2024, 3, 1), d(2024, 3, 3), &participants, &availability);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rank_participants_tie_broken_by_maybe() {
        // p1: available=1, maybe=1; p2: available=1, maybe=0
        let result = rank_participants(
            d(2024, 3, 1),
            d(2024, 3, 3),
            &ids(&["p2", "p1"]),
            &scenario_availability(),
        );
        assert_eq!(result[0].id, "p1");
        assert_eq!(result[0].available, 1);
        assert_eq!(result[0].maybe, 1);
        assert_eq!(result[1].id, "p2");
        assert_eq!(result[1].available, 1);
        assert_eq!(result[1].maybe, 0);
    }

    #[test]
    fn test_rank_participants_full_tie_preserves_input_order() {
        let availability = AvailabilityMap::new();
        let result = rank_participants(
            d(2024, 3, 1),
            d(2024, 3, 3),
            &ids(&["carol", "alice", "bob"]),
            &availability,
        );
        let order: Vec<&str> = result.iter().map(|tally| tally.id.as_str()).collect();
        assert_eq!(order, vec!["carol", "alice", "bob"]);
    }

    #[test]
    fn test_rank_participants_ignores_records_outside_range() {
        let mut availability = scenario_availability();
        availability
            .get_mut("p2")
            .unwrap()
            .insert(d(2024, 4, 1), AvailabilityStatus::Available);

        let result = rank_participants(
            d(2024, 3, 1),
            d(2024, 3, 3),
            &ids(&["p1", "p2"]),
            &availability,
        );
        let p2 = result.iter().find(|tally| tally.id == "p2").unwrap();
        assert_eq!(p2.available, 1);
    }
}
