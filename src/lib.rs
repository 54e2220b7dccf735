pub mod config;
pub mod dates;
pub mod output;
pub mod report;
pub mod scoring;
pub mod store;
pub mod tui;
