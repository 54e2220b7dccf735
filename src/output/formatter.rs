use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::config::Config;
use crate::dates::{format_date_key, format_display_date};
use crate::report::Overview;
use crate::scoring::{DayScore, ParticipantTally};
use crate::store::types::AvailabilityStatus;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

fn colorize_counts(day: &DayScore, use_colors: bool) -> String {
    if use_colors {
        format!(
            "{}{}  {}{}  {}{}",
            "✓".green(),
            day.available.green(),
            "?".yellow(),
            day.maybe.yellow(),
            "✗".red(),
            day.unavailable.red()
        )
    } else {
        format!(
            "✓{}  ?{}  ✗{}",
            day.available, day.maybe, day.unavailable
        )
    }
}

/// Format ranked days as a table with columns: Index, Score, Date, Counts
/// Index column: 3 chars (fits "99."), right-aligned
/// Score column is right-aligned, 5 chars wide
pub fn format_best_days(days: &[DayScore], top: Option<usize>, use_colors: bool) -> String {
    if days.is_empty() {
        return "No days in range.".to_string();
    }

    let shown = top.unwrap_or(days.len()).min(days.len());

    days[..shown]
        .iter()
        .enumerate()
        .map(|(idx, day)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_padded = format!("{:>5}", day.score);
            // "Fri Mar 1" style plus the canonical key for scripting by eye
            let date_str = format!(
                "{:<10} {}",
                format_display_date(day.date),
                format_date_key(day.date)
            );
            let counts = colorize_counts(day, use_colors);

            if use_colors {
                format!(
                    "{} {}  {}  {}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    date_str,
                    counts
                )
            } else {
                format!("{} {}  {}  {}", index_str, score_padded, date_str, counts)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked days as tab-separated values for scripting
/// Columns: date, score, available, maybe, unavailable (no headers, no colors)
pub fn format_best_days_tsv(days: &[DayScore], top: Option<usize>) -> String {
    let shown = top.unwrap_or(days.len()).min(days.len());
    days[..shown]
        .iter()
        .map(|day| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                format_date_key(day.date),
                day.score,
                day.available,
                day.maybe,
                day.unavailable
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the participant ranking, display names resolved via the roster.
pub fn format_ranking(tallies: &[ParticipantTally], config: &Config, use_colors: bool) -> String {
    if tallies.is_empty() {
        return "No participants to rank.".to_string();
    }

    let name_width = tallies
        .iter()
        .map(|tally| config.display_name(&tally.id).chars().count())
        .max()
        .unwrap_or(0);

    tallies
        .iter()
        .enumerate()
        .map(|(idx, tally)| {
            let index_str = format!("{:>2}.", idx + 1);
            let name = format!(
                "{:<width$}",
                config.display_name(&tally.id),
                width = name_width
            );
            let counts = if use_colors {
                format!(
                    "{} available, {} maybe",
                    tally.available.green(),
                    tally.maybe.yellow()
                )
            } else {
                format!("{} available, {} maybe", tally.available, tally.maybe)
            };

            if use_colors {
                format!("{} {}  {}", index_str.dimmed(), name.bold(), counts)
            } else {
                format!("{} {}  {}", index_str, name, counts)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_cell(status: AvailabilityStatus, use_colors: bool) -> String {
    let symbol = status.symbol();
    if !use_colors {
        return symbol.to_string();
    }
    match status {
        AvailabilityStatus::Available => symbol.green().to_string(),
        AvailabilityStatus::Maybe => symbol.yellow().to_string(),
        AvailabilityStatus::Unavailable => symbol.red().to_string(),
        AvailabilityStatus::Unknown => symbol.dimmed().to_string(),
    }
}

/// Format the organizer grid: one header row of day numbers, one row of
/// status symbols per participant. Wide ranges are truncated to the
/// terminal width; pipes get the full grid.
pub fn format_overview(grid: &Overview, config: &Config, use_colors: bool) -> String {
    if grid.rows.is_empty() {
        return "No participants yet.".to_string();
    }
    if grid.days.is_empty() {
        return "No days in range.".to_string();
    }

    let name_width = grid
        .rows
        .iter()
        .map(|row| config.display_name(&row.id).chars().count())
        .max()
        .unwrap_or(0)
        .max("player".len());

    // Each day takes 3 columns: 2-digit day number + space
    let day_columns = match get_terminal_width() {
        Some(width) if width > name_width + 4 => ((width - name_width - 2) / 3).min(grid.days.len()),
        Some(_) => 1,
        None => grid.days.len(),
    };

    let mut lines = Vec::with_capacity(grid.rows.len() + 1);

    let header_days = grid.days[..day_columns]
        .iter()
        .map(|date| format!("{:>2}", chrono::Datelike::day(date)))
        .collect::<Vec<_>>()
        .join(" ");
    let header = format!("{:<width$}  {}", "player", header_days, width = name_width);
    if use_colors {
        lines.push(header.bold().to_string());
    } else {
        lines.push(header);
    }

    for row in &grid.rows {
        let cells = row.statuses[..day_columns]
            .iter()
            .map(|&status| format!(" {}", status_cell(status, use_colors)))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!(
            "{:<width$} {}",
            config.display_name(&row.id),
            cells,
            width = name_width
        ));
    }

    if day_columns < grid.days.len() {
        lines.push(format!(
            "({} more days truncated; pipe the output or narrow the range)",
            grid.days.len() - day_columns
        ));
    }

    lines.join("\n")
}
