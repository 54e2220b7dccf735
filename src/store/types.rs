use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::dates::format_date_key;

/// Per-day availability for a single participant.
///
/// Absent records default to `Unknown`; the store never has to hold an
/// explicit `Unknown` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    #[default]
    Unknown,
    Available,
    Maybe,
    Unavailable,
}

impl AvailabilityStatus {
    /// Next status in the calendar toggle order:
    /// unknown -> available -> maybe -> unavailable -> unknown.
    pub fn cycle(self) -> Self {
        match self {
            AvailabilityStatus::Unknown => AvailabilityStatus::Available,
            AvailabilityStatus::Available => AvailabilityStatus::Maybe,
            AvailabilityStatus::Maybe => AvailabilityStatus::Unavailable,
            AvailabilityStatus::Unavailable => AvailabilityStatus::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AvailabilityStatus::Unknown => "n/a",
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Maybe => "maybe",
            AvailabilityStatus::Unavailable => "unavailable",
        }
    }

    /// One-character symbol for grid output.
    pub fn symbol(self) -> &'static str {
        match self {
            AvailabilityStatus::Unknown => "·",
            AvailabilityStatus::Available => "✓",
            AvailabilityStatus::Maybe => "?",
            AvailabilityStatus::Unavailable => "✗",
        }
    }

    /// Parse a status name as typed on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unknown" | "clear" => Some(AvailabilityStatus::Unknown),
            "available" | "yes" => Some(AvailabilityStatus::Available),
            "maybe" => Some(AvailabilityStatus::Maybe),
            "unavailable" | "no" => Some(AvailabilityStatus::Unavailable),
            _ => None,
        }
    }
}

/// A named, ordered sub-group of participants with a designated owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub owner: String,
    pub members: Vec<String>,
}

impl Table {
    /// Create a table. The owner is always a member and sorts first.
    pub fn new(owner: String, members: Vec<String>) -> Self {
        let mut all = vec![owner.clone()];
        for member in members {
            if !all.contains(&member) {
                all.push(member);
            }
        }
        Table {
            owner,
            members: all,
        }
    }

    /// Add a member, preserving order. Returns false if already present.
    pub fn add_member(&mut self, id: &str) -> bool {
        if self.members.iter().any(|m| m == id) {
            return false;
        }
        self.members.push(id.to_string());
        true
    }

    /// Remove a member. The owner cannot be removed.
    /// Returns true if the member was present and removed.
    pub fn remove_member(&mut self, id: &str) -> bool {
        if id == self.owner {
            return false;
        }
        let before = self.members.len();
        self.members.retain(|m| m != id);
        self.members.len() < before
    }
}

/// Everything the availability store persists: one status per
/// (participant, day) plus the organizer's named tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleState {
    pub version: u32,
    /// participant id -> (date key -> status). Date keys are canonical
    /// `YYYY-MM-DD` strings; BTreeMap keeps serialized output stable.
    #[serde(default)]
    pub records: HashMap<String, BTreeMap<String, AvailabilityStatus>>,
    #[serde(default)]
    pub tables: BTreeMap<String, Table>,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleState {
    /// Create a new empty state with version 1.
    pub fn new() -> Self {
        Self {
            version: 1,
            records: HashMap::new(),
            tables: BTreeMap::new(),
        }
    }

    /// Record a participant's status for a day. Last write wins.
    /// Setting `Unknown` removes the record (absent means unknown), but the
    /// participant stays known to the store.
    pub fn set_status(&mut self, id: &str, date: NaiveDate, status: AvailabilityStatus) {
        let days = self.records.entry(id.to_string()).or_default();
        let key = format_date_key(date);
        if status == AvailabilityStatus::Unknown {
            days.remove(&key);
        } else {
            days.insert(key, status);
        }
    }

    /// Look up a participant's status for a day, defaulting to `Unknown`.
    pub fn status_of(&self, id: &str, date: NaiveDate) -> AvailabilityStatus {
        self.records
            .get(id)
            .and_then(|days| days.get(&format_date_key(date)))
            .copied()
            .unwrap_or_default()
    }

    /// All participant ids that ever recorded availability, sorted.
    pub fn known_participants(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Create a named table. Returns false if the name is already taken.
    pub fn create_table(&mut self, name: &str, table: Table) -> bool {
        if self.tables.contains_key(name) {
            return false;
        }
        self.tables.insert(name.to_string(), table);
        true
    }

    /// Delete a table. Returns true if it existed.
    pub fn delete_table(&mut self, name: &str) -> bool {
        self.tables.remove(name).is_some()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }
}
