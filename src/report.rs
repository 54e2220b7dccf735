//! Builds in-memory availability snapshots from the store and runs the
//! scoring engine over them. The engine never touches storage; this module
//! is where stored date-key strings become calendar dates.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::config::Config;
use crate::dates::{days_in_range, parse_date_key};
use crate::scoring::{
    compute_best_days, rank_participants, status_for, AvailabilityMap, DayScore, ParticipantTally,
};
use crate::store::types::{AvailabilityStatus, ScheduleState};

/// One participant's row in the organizer overview grid.
#[derive(Debug, Clone)]
pub struct OverviewRow {
    pub id: String,
    pub statuses: Vec<AvailabilityStatus>,
}

/// Participants × days status matrix for a range, row order matching
/// `participant_ids`, column order date-ascending.
#[derive(Debug, Clone)]
pub struct Overview {
    pub days: Vec<NaiveDate>,
    pub rows: Vec<OverviewRow>,
}

/// Participants to consider for a query: a table's members when a table is
/// named, otherwise everyone known - the configured roster (in roster
/// order) plus any ids that marked availability without being listed.
pub fn resolve_participants(
    state: &ScheduleState,
    config: &Config,
    table: Option<&str>,
) -> Result<Vec<String>> {
    if let Some(name) = table {
        let table = state
            .table(name)
            .with_context(|| format!("No table named '{}'", name))?;
        return Ok(table.members.clone());
    }

    let mut ids = config.roster_ids();
    for id in state.known_participants() {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Materialize the stored records for `participant_ids` into the in-memory
/// mapping the engine consumes, restricted to `start..=end`.
///
/// Date keys that don't parse are skipped; the store only ever writes
/// canonical keys, so a malformed one is a hand-edited file, not a reason
/// to fail the whole query.
pub fn availability_in_range(
    state: &ScheduleState,
    participant_ids: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> AvailabilityMap {
    let mut availability = AvailabilityMap::new();
    for id in participant_ids {
        let Some(days) = state.records.get(id) else {
            continue;
        };
        let mut parsed: HashMap<NaiveDate, AvailabilityStatus> = HashMap::new();
        for (key, status) in days {
            let Ok(date) = parse_date_key(key) else {
                continue;
            };
            if date >= start && date <= end {
                parsed.insert(date, *status);
            }
        }
        availability.insert(id.clone(), parsed);
    }
    availability
}

/// Ranked best days for the range, scoped to a table when given.
pub fn best_days_report(
    state: &ScheduleState,
    config: &Config,
    table: Option<&str>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DayScore>> {
    let participants = resolve_participants(state, config, table)?;
    let availability = availability_in_range(state, &participants, start, end);
    Ok(compute_best_days(start, end, &participants, &availability))
}

/// Ranked participants for the range, scoped to a table when given.
pub fn participant_report(
    state: &ScheduleState,
    config: &Config,
    table: Option<&str>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ParticipantTally>> {
    let participants = resolve_participants(state, config, table)?;
    let availability = availability_in_range(state, &participants, start, end);
    Ok(rank_participants(start, end, &participants, &availability))
}

/// The organizer's grid: every participant's status for every day in range.
pub fn overview(
    state: &ScheduleState,
    config: &Config,
    table: Option<&str>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Overview> {
    let participants = resolve_participants(state, config, table)?;
    let availability = availability_in_range(state, &participants, start, end);
    let days = days_in_range(start, end);

    let rows = participants
        .into_iter()
        .map(|id| {
            let statuses = days
                .iter()
                .map(|&date| status_for(&availability, &id, date))
                .collect();
            OverviewRow { id, statuses }
        })
        .collect();

    Ok(Overview { days, rows })
}
