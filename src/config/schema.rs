use serde::{Deserialize, Serialize};

fn default_horizon_days() -> u32 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Participant id of whoever is running the tool. Used as the default
    /// identity for `calendar` and `mark`.
    #[serde(default)]
    pub me: Option<String>,

    /// The group roster: ids plus optional display names.
    /// Participants who marked availability but aren't listed here are
    /// still considered; the roster only adds names and ordering.
    #[serde(default)]
    pub roster: Vec<RosterEntry>,

    /// Default query range length in days (today through today + N - 1).
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,

    /// "dark", "light" or "system" (default).
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RosterEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            me: None,
            roster: Vec::new(),
            horizon_days: default_horizon_days(),
            theme: None,
        }
    }
}

impl Config {
    /// Resolve a participant id to its display name. Ids without a roster
    /// entry display as themselves.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.roster
            .iter()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.name.as_deref())
            .unwrap_or(id)
    }

    /// Roster ids in configured order.
    pub fn roster_ids(&self) -> Vec<String> {
        self.roster.iter().map(|entry| entry.id.clone()).collect()
    }
}

/// Validate the configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.horizon_days == 0 {
        errors.push("horizon_days: must be at least 1".to_string());
    }

    if let Some(ref theme) = config.theme {
        if !matches!(theme.as_str(), "dark" | "light" | "system") {
            errors.push(format!(
                "theme: unknown theme '{}' (expected dark, light or system)",
                theme
            ));
        }
    }

    if let Some(ref me) = config.me {
        if me.trim().is_empty() {
            errors.push("me: must not be empty".to_string());
        }
    }

    let mut seen = std::collections::HashSet::new();
    for (i, entry) in config.roster.iter().enumerate() {
        if entry.id.trim().is_empty() {
            errors.push(format!("roster[{}].id: must not be empty", i));
        } else if !seen.insert(entry.id.as_str()) {
            errors.push(format!("roster[{}].id: duplicate id '{}'", i, entry.id));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.me.is_none());
        assert!(config.roster.is_empty());
        assert_eq!(config.horizon_days, 30);
        assert!(config.theme.is_none());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
me: gm
roster:
  - id: gm
    name: The GM
  - id: alice
horizon_days: 14
theme: dark
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.me.as_deref(), Some("gm"));
        assert_eq!(config.roster.len(), 2);
        assert_eq!(config.horizon_days, 14);
        assert_eq!(config.theme.as_deref(), Some("dark"));
    }

    #[test]
    fn test_partial_config_parse_uses_defaults() {
        let yaml = "me: alice\n";
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.me.as_deref(), Some("alice"));
        assert_eq!(config.horizon_days, 30);
        assert!(config.roster.is_empty());
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let yaml = r#"
roster:
  - id: gm
    name: The GM
  - id: alice
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.display_name("gm"), "The GM");
        assert_eq!(config.display_name("alice"), "alice");
        assert_eq!(config.display_name("stranger"), "stranger");
    }

    #[test]
    fn test_validate_accepts_default() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            me: Some("  ".to_string()),
            roster: vec![
                RosterEntry {
                    id: "alice".to_string(),
                    name: None,
                },
                RosterEntry {
                    id: "alice".to_string(),
                    name: None,
                },
            ],
            horizon_days: 0,
            theme: Some("sepia".to_string()),
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
