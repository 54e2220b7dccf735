use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, Config, RosterEntry};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

/// Parse an "id" or "id=Display Name" roster line.
fn parse_roster_entry(s: &str) -> RosterEntry {
    match s.split_once('=') {
        Some((id, name)) => RosterEntry {
            id: id.trim().to_string(),
            name: Some(name.trim().to_string()),
        },
        None => RosterEntry {
            id: s.trim().to_string(),
            name: None,
        },
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("Tablemate Configuration Wizard");
    println!("==============================");
    println!();

    // 1. Identity
    typewriter("Pick a short id for yourself. Availability you mark on the calendar is recorded under this id.");
    let me = loop {
        let input = prompt("Your participant id (e.g., 'alice'): ")?;
        if !input.is_empty() {
            break input;
        }
        println!("  An id is required.");
    };

    // 2. Roster
    println!();
    typewriter("Now the group roster. Anyone who marks availability is tracked automatically;");
    typewriter("listing them here just gives them display names and a stable order.");
    typewriter("Use 'id' or 'id=Display Name' (e.g., 'gm=The GM').");
    let mut roster: Vec<RosterEntry> = vec![parse_roster_entry(&me)];
    let mut add_member = prompt_yes_no("Add a group member?", true)?;
    while add_member {
        let line = prompt("  Member (id or id=Display Name): ")?;
        if line.is_empty() {
            println!("  Member id is required.");
        } else {
            let entry = parse_roster_entry(&line);
            if roster.iter().any(|existing| existing.id == entry.id) {
                println!("  '{}' is already on the roster.", entry.id);
            } else {
                roster.push(entry);
            }
        }
        add_member = prompt_yes_no("  Add another member?", false)?;
    }

    // 3. Horizon
    println!();
    typewriter("The horizon is how many days ahead 'best' and 'who' look by default.");
    typewriter("You can always override it with --from/--to or --month.");
    let horizon_days: u32 = loop {
        let input = prompt_with_default("Horizon in days", "30")?;
        match input.parse::<u32>() {
            Ok(v) if v >= 1 => break v,
            Ok(_) => println!("  Invalid: must be at least 1. Try again."),
            Err(_) => println!("  Invalid: must be a whole number of days. Try again."),
        }
    };

    // 4. Theme
    println!();
    typewriter("The calendar supports a dark and a light palette. 'system' picks one");
    typewriter("from your terminal's background color.");
    let theme = loop {
        let input = prompt_with_default("Theme (dark/light/system)", "system")?;
        match input.as_str() {
            "dark" | "light" | "system" => break input,
            _ => println!("  Invalid: expected dark, light or system. Try again."),
        }
    };

    // 5. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 6. Write config
    let config = Config {
        me: Some(me),
        roster,
        horizon_days,
        theme: Some(theme),
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    typewriter("Run `tablemate` to open the calendar and start marking days, or `tablemate best` once your group has answered.");

    Ok(())
}
