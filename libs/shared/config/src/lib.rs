use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_HORIZON_DAYS: u32 = 14;
pub const DEFAULT_MAX_HORIZON_DAYS: u32 = 90;
pub const DEFAULT_SERVER_PORT: u16 = 3000;
/// Upper bound for any configured horizon, one leap year.
pub const HORIZON_CEILING_DAYS: u32 = 366;

/// How the last slot of an availability window is treated when the slot
/// duration does not divide the window evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotBoundaryPolicy {
    /// Emit every slot that starts before the window end, even if it runs past it.
    #[default]
    AllowOverrun,
    /// Emit a slot only if it also finishes by the window end.
    WithinWindow,
}

impl FromStr for SlotBoundaryPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "allow_overrun" => Ok(Self::AllowOverrun),
            "within_window" => Ok(Self::WithinWindow),
            other => Err(format!("unknown slot boundary policy '{}'", other)),
        }
    }
}

impl fmt::Display for SlotBoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllowOverrun => write!(f, "allow_overrun"),
            Self::WithinWindow => write!(f, "within_window"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub default_horizon_days: u32,
    pub max_horizon_days: u32,
    pub slot_boundary_policy: SlotBoundaryPolicy,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            default_horizon_days: DEFAULT_HORIZON_DAYS,
            max_horizon_days: DEFAULT_MAX_HORIZON_DAYS,
            slot_boundary_policy: SlotBoundaryPolicy::default(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to
    /// defaults for missing or unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            supabase_url: lookup("SUPABASE_URL").unwrap_or_else(|| {
                warn!("SUPABASE_URL not set, using empty value");
                String::new()
            }),
            supabase_anon_key: lookup("SUPABASE_ANON_PUBLIC_KEY").unwrap_or_else(|| {
                warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                String::new()
            }),
            default_horizon_days: parse_or_default(&lookup, "SLOT_HORIZON_DAYS", DEFAULT_HORIZON_DAYS),
            max_horizon_days: parse_or_default(&lookup, "SLOT_MAX_HORIZON_DAYS", DEFAULT_MAX_HORIZON_DAYS),
            slot_boundary_policy: parse_or_default(
                &lookup,
                "SLOT_BOUNDARY_POLICY",
                SlotBoundaryPolicy::default(),
            ),
            server_port: parse_or_default(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT),
        };

        if config.default_horizon_days == 0 {
            warn!("SLOT_HORIZON_DAYS must be positive, using {}", DEFAULT_HORIZON_DAYS);
            config.default_horizon_days = DEFAULT_HORIZON_DAYS;
        }

        if config.default_horizon_days > HORIZON_CEILING_DAYS {
            warn!(
                "SLOT_HORIZON_DAYS ({}) exceeds {} days, capping it",
                config.default_horizon_days, HORIZON_CEILING_DAYS
            );
            config.default_horizon_days = HORIZON_CEILING_DAYS;
        }

        if config.max_horizon_days > HORIZON_CEILING_DAYS {
            warn!(
                "SLOT_MAX_HORIZON_DAYS ({}) exceeds {} days, capping it",
                config.max_horizon_days, HORIZON_CEILING_DAYS
            );
            config.max_horizon_days = HORIZON_CEILING_DAYS;
        }

        if config.max_horizon_days < config.default_horizon_days {
            warn!(
                "SLOT_MAX_HORIZON_DAYS ({}) is below SLOT_HORIZON_DAYS ({}), raising it",
                config.max_horizon_days, config.default_horizon_days
            );
            config.max_horizon_days = config.default_horizon_days;
        }

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);

        assert_eq!(config.default_horizon_days, 14);
        assert_eq!(config.max_horizon_days, 90);
        assert_eq!(config.slot_boundary_policy, SlotBoundaryPolicy::AllowOverrun);
        assert_eq!(config.server_port, 3000);
        assert!(!config.is_configured());
    }

    #[test]
    fn test_reads_all_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "http://localhost:54321"),
            ("SUPABASE_ANON_PUBLIC_KEY", "anon"),
            ("SLOT_HORIZON_DAYS", "7"),
            ("SLOT_MAX_HORIZON_DAYS", "30"),
            ("SLOT_BOUNDARY_POLICY", "within_window"),
            ("SERVER_PORT", "8080"),
        ]));

        assert!(config.is_configured());
        assert_eq!(config.default_horizon_days, 7);
        assert_eq!(config.max_horizon_days, 30);
        assert_eq!(config.slot_boundary_policy, SlotBoundaryPolicy::WithinWindow);
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SLOT_HORIZON_DAYS", "0"),
            ("SLOT_MAX_HORIZON_DAYS", "5"),
            ("SLOT_BOUNDARY_POLICY", "sometimes"),
            ("SERVER_PORT", "not-a-port"),
        ]));

        assert_eq!(config.default_horizon_days, 14);
        assert_eq!(config.max_horizon_days, 14);
        assert_eq!(config.slot_boundary_policy, SlotBoundaryPolicy::AllowOverrun);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_oversized_horizons_are_capped() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SLOT_HORIZON_DAYS", "5000"),
            ("SLOT_MAX_HORIZON_DAYS", "4294967295"),
        ]));

        assert_eq!(config.default_horizon_days, HORIZON_CEILING_DAYS);
        assert_eq!(config.max_horizon_days, HORIZON_CEILING_DAYS);
    }

    #[test]
    fn test_policy_parsing_is_case_insensitive() {
        assert_eq!("Within_Window".parse::<SlotBoundaryPolicy>(), Ok(SlotBoundaryPolicy::WithinWindow));
        assert!("".parse::<SlotBoundaryPolicy>().is_err());
    }
}
