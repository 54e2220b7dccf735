use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use tablemate::store::types::{AvailabilityStatus, Table};

const EXIT_SUCCESS: i32 = 0;
const EXIT_STORE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug, Clone)]
struct RangeArgs {
    /// Restrict to a whole month (YYYY-MM)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    month: Option<String>,

    /// First day of the range (YYYY-MM-DD, default today)
    #[arg(long)]
    from: Option<String>,

    /// Last day of the range (YYYY-MM-DD, default from + horizon)
    #[arg(long)]
    to: Option<String>,
}

impl RangeArgs {
    /// Resolve to an inclusive (start, end) pair. With no flags the range
    /// is today through today + horizon_days - 1.
    fn resolve(
        &self,
        today: NaiveDate,
        horizon_days: u32,
    ) -> anyhow::Result<(NaiveDate, NaiveDate)> {
        if let Some(ref month) = self.month {
            let (year, month) = tablemate::dates::parse_month(month)?;
            return tablemate::dates::month_bounds(year, month);
        }

        let start = match self.from {
            Some(ref s) => tablemate::dates::parse_date_key(s)?,
            None => today,
        };
        let end = match self.to {
            Some(ref s) => tablemate::dates::parse_date_key(s)?,
            None => start + chrono::Duration::days(i64::from(horizon_days) - 1),
        };
        Ok((start, end))
    }

    /// Like `resolve`, but defaulting to the current month instead of the
    /// horizon window. Used by `overview`, which mirrors a monthly grid.
    fn resolve_month(&self, today: NaiveDate) -> anyhow::Result<(NaiveDate, NaiveDate)> {
        use chrono::Datelike;
        if self.month.is_none() && self.from.is_none() && self.to.is_none() {
            return tablemate::dates::month_bounds(today.year(), today.month());
        }
        self.resolve(today, 1)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive calendar to mark your availability (default)
    Calendar {
        /// Mark availability as this participant id instead of `me`
        #[arg(long = "as")]
        as_participant: Option<String>,
    },
    /// Rank the days that best fit the group, best first
    Best {
        #[command(flatten)]
        range: RangeArgs,

        /// Restrict to the members of a named table
        #[arg(long)]
        table: Option<String>,

        /// Show only the first K days
        #[arg(long)]
        top: Option<usize>,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Rank participants by how many days they can make
    Who {
        #[command(flatten)]
        range: RangeArgs,

        /// Restrict to the members of a named table
        #[arg(long)]
        table: Option<String>,
    },
    /// Show the full players-by-days availability grid
    Overview {
        #[command(flatten)]
        range: RangeArgs,

        /// Restrict to the members of a named table
        #[arg(long)]
        table: Option<String>,
    },
    /// Record availability from the command line
    Mark {
        /// Days to mark: YYYY-MM-DD or YYYY-MM-DD..YYYY-MM-DD ranges
        #[arg(required = true)]
        dates: Vec<String>,

        /// available | maybe | unavailable | unknown (aliases: yes, no, clear)
        #[arg(short, long)]
        status: String,

        /// Mark availability as this participant id instead of `me`
        #[arg(long = "as")]
        as_participant: Option<String>,
    },
    /// Manage tables (named sub-groups with an owner)
    Table {
        #[command(subcommand)]
        command: TableCommands,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Subcommand, Debug)]
enum TableCommands {
    /// Create a table. The owner is always a member.
    Create {
        name: String,
        /// Owner id (defaults to `me`)
        #[arg(long)]
        owner: Option<String>,
        /// Initial members
        members: Vec<String>,
    },
    /// Delete a table
    Delete { name: String },
    /// Add a member to a table
    Add { name: String, member: String },
    /// Remove a member from a table (the owner cannot be removed)
    Remove { name: String, member: String },
    /// List tables and their members
    List,
}

#[derive(Parser, Debug)]
#[command(name = "tablemate")]
#[command(about = "Session scheduling for tabletop groups", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/tablemate/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the availability store (defaults to ~/.config/tablemate/availability.json)
    #[arg(long, global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Expand date arguments, each a single day or an inclusive `A..B` range.
fn parse_date_args(args: &[String]) -> anyhow::Result<Vec<NaiveDate>> {
    let mut dates = Vec::new();
    for arg in args {
        if let Some((start_str, end_str)) = arg.split_once("..") {
            let start = tablemate::dates::parse_date_key(start_str)?;
            let end = tablemate::dates::parse_date_key(end_str)?;
            if start > end {
                anyhow::bail!("Inverted range '{}'", arg);
            }
            dates.extend(tablemate::dates::days_in_range(start, end));
        } else {
            dates.push(tablemate::dates::parse_date_key(arg)?);
        }
    }
    Ok(dates)
}

/// Pick the identity to mark availability as: --as wins, then config `me`.
fn resolve_identity(explicit: Option<String>, config: &tablemate::config::Config) -> Option<String> {
    explicit.or_else(|| config.me.clone())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Calendar {
        as_participant: None,
    });
    let start_time = Instant::now();
    let today = chrono::Local::now().date_naive();

    // Init runs before config loading: there may be nothing to load yet
    if matches!(command, Commands::Init) {
        let path = cli.config.map(PathBuf::from);
        if let Err(e) = tablemate::config::run_init_wizard(path) {
            eprintln!("Init error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match tablemate::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = tablemate::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    // Load the availability store
    let store_path = cli
        .store
        .map(PathBuf::from)
        .unwrap_or_else(tablemate::store::get_store_path);
    let mut state = match tablemate::store::load_state(&store_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Store error: {}", e);
            std::process::exit(EXIT_STORE);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} participants, {} tables from {}",
            state.records.len(),
            state.tables.len(),
            store_path.display()
        );
    }

    let use_colors = tablemate::output::should_use_colors();

    match command {
        Commands::Calendar { as_participant } => {
            let me = match resolve_identity(as_participant, &config) {
                Some(id) => id,
                None => {
                    eprintln!("No participant id configured.");
                    eprintln!("Run `tablemate init` or pass --as <id>.");
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let theme = config
                .theme
                .as_deref()
                .and_then(tablemate::tui::Theme::parse)
                .unwrap_or_default();
            let colors = tablemate::tui::resolve_theme(theme);

            let app = tablemate::tui::App::new(state, store_path, config, me, today, colors);
            if let Err(e) = tablemate::tui::run_tui(app).await {
                eprintln!("Calendar error: {}", e);
                std::process::exit(EXIT_STORE);
            }
        }
        Commands::Best {
            range,
            table,
            top,
            tsv,
        } => {
            let (start, end) = match range.resolve(today, config.horizon_days) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Range error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            match tablemate::report::best_days_report(&state, &config, table.as_deref(), start, end)
            {
                Ok(days) => {
                    let output = if tsv {
                        tablemate::output::format_best_days_tsv(&days, top)
                    } else {
                        tablemate::output::format_best_days(&days, top, use_colors)
                    };
                    println!("{}", output);
                    if cli.verbose {
                        eprintln!();
                        eprintln!(
                            "Scored {} days in {:?}",
                            days.len(),
                            start_time.elapsed()
                        );
                    }
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::Who { range, table } => {
            let (start, end) = match range.resolve(today, config.horizon_days) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Range error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            match tablemate::report::participant_report(
                &state,
                &config,
                table.as_deref(),
                start,
                end,
            ) {
                Ok(tallies) => {
                    println!(
                        "{}",
                        tablemate::output::format_ranking(&tallies, &config, use_colors)
                    );
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::Overview { range, table } => {
            let (start, end) = match range.resolve_month(today) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Range error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            match tablemate::report::overview(&state, &config, table.as_deref(), start, end) {
                Ok(grid) => {
                    println!(
                        "{}",
                        tablemate::output::format_overview(&grid, &config, use_colors)
                    );
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::Mark {
            dates,
            status,
            as_participant,
        } => {
            let me = match resolve_identity(as_participant, &config) {
                Some(id) => id,
                None => {
                    eprintln!("No participant id configured.");
                    eprintln!("Run `tablemate init` or pass --as <id>.");
                    std::process::exit(EXIT_CONFIG);
                }
            };
            let status = match AvailabilityStatus::parse(&status) {
                Some(s) => s,
                None => {
                    eprintln!(
                        "Unknown status '{}'. Expected available, maybe, unavailable or unknown.",
                        status
                    );
                    std::process::exit(EXIT_CONFIG);
                }
            };
            let days = match parse_date_args(&dates) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("Date error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            for &date in &days {
                state.set_status(&me, date, status);
            }
            if let Err(e) = tablemate::store::save_state(&store_path, &state) {
                eprintln!("Store error: {}", e);
                std::process::exit(EXIT_STORE);
            }
            println!("Marked {} day(s) as {} for {}", days.len(), status.label(), me);
        }
        Commands::Table { command } => {
            if let Err(code) = run_table_command(command, &mut state, &store_path, &config) {
                std::process::exit(code);
            }
        }
        Commands::Init => unreachable!("handled above"),
    }

    std::process::exit(EXIT_SUCCESS);
}

fn run_table_command(
    command: TableCommands,
    state: &mut tablemate::store::ScheduleState,
    store_path: &std::path::Path,
    config: &tablemate::config::Config,
) -> Result<(), i32> {
    let save = |state: &tablemate::store::ScheduleState| {
        tablemate::store::save_state(store_path, state).map_err(|e| {
            eprintln!("Store error: {}", e);
            EXIT_STORE
        })
    };

    match command {
        TableCommands::Create {
            name,
            owner,
            members,
        } => {
            let owner = match owner.or_else(|| config.me.clone()) {
                Some(id) => id,
                None => {
                    eprintln!("No owner given and no `me` configured. Pass --owner <id>.");
                    return Err(EXIT_CONFIG);
                }
            };
            let table = Table::new(owner, members);
            if !state.create_table(&name, table) {
                eprintln!("A table named '{}' already exists.", name);
                return Err(EXIT_CONFIG);
            }
            save(state)?;
            println!("Created table '{}'", name);
        }
        TableCommands::Delete { name } => {
            if !state.delete_table(&name) {
                eprintln!("No table named '{}'", name);
                return Err(EXIT_CONFIG);
            }
            save(state)?;
            println!("Deleted table '{}'", name);
        }
        TableCommands::Add { name, member } => {
            let Some(table) = state.table_mut(&name) else {
                eprintln!("No table named '{}'", name);
                return Err(EXIT_CONFIG);
            };
            if !table.add_member(&member) {
                eprintln!("'{}' is already a member of '{}'", member, name);
                return Err(EXIT_CONFIG);
            }
            save(state)?;
            println!("Added '{}' to '{}'", member, name);
        }
        TableCommands::Remove { name, member } => {
            let Some(table) = state.table_mut(&name) else {
                eprintln!("No table named '{}'", name);
                return Err(EXIT_CONFIG);
            };
            if table.owner == member {
                eprintln!("'{}' owns '{}' and cannot be removed.", member, name);
                return Err(EXIT_CONFIG);
            }
            if !table.remove_member(&member) {
                eprintln!("'{}' is not a member of '{}'", member, name);
                return Err(EXIT_CONFIG);
            }
            save(state)?;
            println!("Removed '{}' from '{}'", member, name);
        }
        TableCommands::List => {
            if state.tables.is_empty() {
                println!("No tables yet. Create one with `tablemate table create <name>`.");
            }
            for (name, table) in &state.tables {
                let members = table
                    .members
                    .iter()
                    .map(|id| {
                        if *id == table.owner {
                            format!("{} (owner)", config.display_name(id))
                        } else {
                            config.display_name(id).to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{}: {}", name, members);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date_args_singles_and_ranges() {
        let args = vec![
            "2024-03-01".to_string(),
            "2024-03-05..2024-03-07".to_string(),
        ];
        let dates = parse_date_args(&args).unwrap();
        assert_eq!(
            dates,
            vec![
                d(2024, 3, 1),
                d(2024, 3, 5),
                d(2024, 3, 6),
                d(2024, 3, 7)
            ]
        );
    }

    #[test]
    fn test_parse_date_args_rejects_inverted_range() {
        let args = vec!["2024-03-07..2024-03-05".to_string()];
        assert!(parse_date_args(&args).is_err());
    }

    #[test]
    fn test_range_args_default_uses_horizon() {
        let range = RangeArgs {
            month: None,
            from: None,
            to: None,
        };
        let (start, end) = range.resolve(d(2024, 3, 1), 7).unwrap();
        assert_eq!(start, d(2024, 3, 1));
        assert_eq!(end, d(2024, 3, 7));
    }

    #[test]
    fn test_range_args_month() {
        let range = RangeArgs {
            month: Some("2024-02".to_string()),
            from: None,
            to: None,
        };
        let (start, end) = range.resolve(d(2024, 3, 1), 30).unwrap();
        assert_eq!(start, d(2024, 2, 1));
        assert_eq!(end, d(2024, 2, 29));
    }

    #[test]
    fn test_range_args_explicit_from_to() {
        let range = RangeArgs {
            month: None,
            from: Some("2024-03-10".to_string()),
            to: Some("2024-03-12".to_string()),
        };
        let (start, end) = range.resolve(d(2024, 3, 1), 30).unwrap();
        assert_eq!(start, d(2024, 3, 10));
        assert_eq!(end, d(2024, 3, 12));
    }

    #[test]
    fn test_resolve_month_defaults_to_current_month() {
        let range = RangeArgs {
            month: None,
            from: None,
            to: None,
        };
        let (start, end) = range.resolve_month(d(2024, 3, 15)).unwrap();
        assert_eq!(start, d(2024, 3, 1));
        assert_eq!(end, d(2024, 3, 31));
    }
}
