pub mod storage;
pub mod types;

pub use storage::{get_store_path, load_state, save_state};
pub use types::{AvailabilityStatus, ScheduleState, Table};
