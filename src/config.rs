//! Environment-backed defaults for the CLI.
//!
//! `.env` is loaded first (if present), then:
//!
//! - `FLOW_INPUT`: default history CSV path
//! - `FLOW_SEED`: default noise seed
//!
//! Explicit CLI flags always win over the environment.

use std::path::PathBuf;

use crate::cli::DataArgs;
use crate::domain::{FlowConfig, YearSelection};
use crate::error::AppError;

/// File name of the hub's open-data export.
pub const DEFAULT_INPUT: &str =
    "frequentation-du-pole-de-la-defense-experimentation-lissage-des-heures-de-pointe.csv";

pub const ENV_INPUT: &str = "FLOW_INPUT";
pub const ENV_SEED: &str = "FLOW_SEED";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    pub input: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl EnvSettings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_vars(
            std::env::var(ENV_INPUT).ok().as_deref(),
            std::env::var(ENV_SEED).ok().as_deref(),
        )
    }

    fn from_vars(input: Option<&str>, seed: Option<&str>) -> Result<Self, AppError> {
        let input = input
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let seed = match seed.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|e| AppError::input(format!("Invalid {ENV_SEED} '{raw}': {e}")))?,
            ),
            None => None,
        };
        Ok(Self { input, seed })
    }
}

pub fn flow_config_from_args(args: &DataArgs, env: &EnvSettings) -> FlowConfig {
    let input = args
        .input
        .clone()
        .or_else(|| env.input.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

    let years = if args.all_years {
        YearSelection::All
    } else if !args.years.is_empty() {
        YearSelection::Explicit(args.years.clone())
    } else {
        YearSelection::default()
    };

    FlowConfig {
        input,
        seed: args.seed.or(env.seed),
        years,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> DataArgs {
        DataArgs {
            input: None,
            seed: None,
            years: Vec::new(),
            all_years: false,
        }
    }

    #[test]
    fn env_vars_parse() {
        let env = EnvSettings::from_vars(Some(" data.csv "), Some("12")).unwrap();
        assert_eq!(env.input, Some(PathBuf::from("data.csv")));
        assert_eq!(env.seed, Some(12));

        let env = EnvSettings::from_vars(Some(""), None).unwrap();
        assert_eq!(env, EnvSettings::default());

        let err = EnvSettings::from_vars(None, Some("abc")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn flags_override_env() {
        let env = EnvSettings {
            input: Some(PathBuf::from("env.csv")),
            seed: Some(1),
        };
        let config = flow_config_from_args(&args(), &env);
        assert_eq!(config.input, PathBuf::from("env.csv"));
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.years, YearSelection::Latest(2));

        let mut a = args();
        a.input = Some(PathBuf::from("flag.csv"));
        a.seed = Some(2);
        a.years = vec![2023];
        let config = flow_config_from_args(&a, &env);
        assert_eq!(config.input, PathBuf::from("flag.csv"));
        assert_eq!(config.seed, Some(2));
        assert_eq!(config.years, YearSelection::Explicit(vec![2023]));

        a.all_years = true;
        assert_eq!(flow_config_from_args(&a, &env).years, YearSelection::All);
    }

    #[test]
    fn falls_back_to_default_input() {
        let config = flow_config_from_args(&args(), &EnvSettings::default());
        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.seed, None);
    }
}
