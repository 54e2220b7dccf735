pub mod formatter;

pub use formatter::{
    format_best_days, format_best_days_tsv, format_overview, format_ranking, should_use_colors,
};
