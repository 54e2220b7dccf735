pub mod engine;

pub use engine::{
    compute_best_days, rank_participants, status_for, AvailabilityMap, DayScore, ParticipantTally,
};
