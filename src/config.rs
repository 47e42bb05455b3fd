use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Upper-section bonus: `points` are added once Ones..Sixes reach `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpperBonus {
    pub threshold: u32,
    pub points: u32,
}

/// Which combination counts when several satisfy a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComboSelection {
    #[default]
    Highest,
    Lowest,
}

/// Game-design constants for scoring.
///
/// `villa_points` and `tower_points` fall back to the sum of the dice when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub maxi_yatzy_points: u32,
    pub villa_points: Option<u32>,
    pub tower_points: Option<u32>,
    pub upper_bonus: Option<UpperBonus>,
    pub combo_selection: ComboSelection,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            maxi_yatzy_points: 100,
            villa_points: None,
            tower_points: None,
            upper_bonus: None,
            combo_selection: ComboSelection::Highest,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Capacity of each per-game broadcast channel
    pub event_capacity: usize,
    /// How many times a mutation is re-read and re-applied after losing a save race
    pub conflict_retries: u32,
    pub rules: ScoringRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            event_capacity: 100,
            conflict_retries: 3,
            rules: ScoringRules::default(),
        }
    }
}

const PREFIX: &str = "MAKSIJATSI_";

impl AppConfig {
    /// Reads `MAKSIJATSI_*` variables, keeping defaults for anything unset
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            let key = format!("{}{}", PREFIX, name);
            lookup(&key).map(|value| (key, value.trim().to_string()))
        };

        let mut config = AppConfig::default();

        if let Some((_, value)) = get("BIND_ADDR") {
            config.bind_addr = value;
        }
        if let Some((key, value)) = get("EVENT_CAPACITY") {
            config.event_capacity = parse_number(&key, &value)?;
            if config.event_capacity == 0 {
                return Err(ConfigError::InvalidValue { key, value });
            }
        }
        if let Some((key, value)) = get("CONFLICT_RETRIES") {
            config.conflict_retries = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = get("MAXI_YATZY_POINTS") {
            config.rules.maxi_yatzy_points = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = get("VILLA_POINTS") {
            config.rules.villa_points = Some(parse_number(&key, &value)?);
        }
        if let Some((key, value)) = get("TOWER_POINTS") {
            config.rules.tower_points = Some(parse_number(&key, &value)?);
        }
        if let Some((key, value)) = get("UPPER_BONUS") {
            config.rules.upper_bonus = parse_upper_bonus(&key, &value)?;
        }
        if let Some((key, value)) = get("COMBO_SELECTION") {
            config.rules.combo_selection = match value.to_ascii_lowercase().as_str() {
                "highest" => ComboSelection::Highest,
                "lowest" => ComboSelection::Lowest,
                _ => return Err(ConfigError::InvalidValue { key, value }),
            };
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// `threshold:points`, or `off`/empty to disable
fn parse_upper_bonus(key: &str, value: &str) -> Result<Option<UpperBonus>, ConfigError> {
    if value.is_empty() || value.eq_ignore_ascii_case("off") {
        return Ok(None);
    }

    let (threshold, points) = value.split_once(':').ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })?;

    Ok(Some(UpperBonus {
        threshold: parse_number(key, threshold.trim())?,
        points: parse_number(key, points.trim())?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.rules.maxi_yatzy_points, 100);
        assert!(config.rules.upper_bonus.is_none());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MAKSIJATSI_BIND_ADDR", "127.0.0.1:8080"),
            ("MAKSIJATSI_EVENT_CAPACITY", "16"),
            ("MAKSIJATSI_CONFLICT_RETRIES", "0"),
            ("MAKSIJATSI_MAXI_YATZY_POINTS", "50"),
            ("MAKSIJATSI_VILLA_POINTS", "40"),
            ("MAKSIJATSI_TOWER_POINTS", "45"),
            ("MAKSIJATSI_UPPER_BONUS", "84:50"),
            ("MAKSIJATSI_COMBO_SELECTION", "Lowest"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.event_capacity, 16);
        assert_eq!(config.conflict_retries, 0);
        assert_eq!(config.rules.maxi_yatzy_points, 50);
        assert_eq!(config.rules.villa_points, Some(40));
        assert_eq!(config.rules.tower_points, Some(45));
        assert_eq!(
            config.rules.upper_bonus,
            Some(UpperBonus {
                threshold: 84,
                points: 50
            })
        );
        assert_eq!(config.rules.combo_selection, ComboSelection::Lowest);
    }

    #[test]
    fn test_upper_bonus_can_be_disabled() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("MAKSIJATSI_UPPER_BONUS", "off")])).unwrap();
        assert!(config.rules.upper_bonus.is_none());
    }

    #[test]
    fn test_rejects_malformed_values() {
        let err = AppConfig::from_lookup(lookup_from(&[("MAKSIJATSI_UPPER_BONUS", "84")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "MAKSIJATSI_UPPER_BONUS"));

        assert!(AppConfig::from_lookup(lookup_from(&[("MAKSIJATSI_EVENT_CAPACITY", "0")])).is_err());
        assert!(
            AppConfig::from_lookup(lookup_from(&[("MAKSIJATSI_CONFLICT_RETRIES", "-1")])).is_err()
        );
        assert!(
            AppConfig::from_lookup(lookup_from(&[("MAKSIJATSI_COMBO_SELECTION", "median")]))
                .is_err()
        );
    }
}
