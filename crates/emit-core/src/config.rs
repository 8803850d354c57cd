//! Emission schedule configuration.
//!
//! [`EmissionsConfig`] carries every parameter of a simulation run. Defaults
//! reproduce the reference schedule; [`EmissionsConfig::load`] layers an
//! optional config file and `EMIT_*` environment variables on top of them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::amount::{Amount, Rate};
use crate::constants::*;
use crate::error::ConfigError;

/// Prefix for environment variable overrides (`EMIT_SUPPLY_CAP`, ...).
pub const ENV_PREFIX: &str = "EMIT";

/// File name looked up under the user config directory.
pub const DEFAULT_CONFIG_FILE: &str = "emissions.toml";

/// Field names accepted from config files and `EMIT_*` variables.
pub const FIELDS: [&str; 11] = [
    "initial_allocation",
    "allocation_decay_rate",
    "allocation_decay_period",
    "engagement_decay_rate",
    "engagement_decay_period",
    "engagement_decay_cap",
    "treasury_rate",
    "bonus_pool_start_cycle",
    "bonus_pool_share",
    "supply_cap",
    "migration_amount",
];

/// Parameters of one emission schedule simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmissionsConfig {
    /// Allocation and engagement paid in the bootstrap cycle.
    pub initial_allocation: Amount,
    /// Fraction the allocation shrinks by at each decay application.
    pub allocation_decay_rate: Rate,
    /// Cycles between allocation decay applications.
    pub allocation_decay_period: u64,
    /// Engagement decay added per elapsed period.
    pub engagement_decay_rate: Rate,
    /// Cycles per engagement decay step.
    pub engagement_decay_period: u64,
    /// Upper bound on the accumulated engagement decay.
    pub engagement_decay_cap: Rate,
    /// Fraction of allocation + engagement routed to the treasury.
    pub treasury_rate: Rate,
    /// First cycle in which the bonus pool is funded.
    pub bonus_pool_start_cycle: u64,
    /// Fraction of the treasury redirected to the bonus pool once active.
    pub bonus_pool_share: Rate,
    /// Hard ceiling on total minted supply, migration included.
    pub supply_cap: Amount,
    /// Supply minted outside the schedule but counted toward the cap.
    pub migration_amount: Amount,
}

impl Default for EmissionsConfig {
    fn default() -> Self {
        Self {
            initial_allocation: Amount::from_micros(DEFAULT_INITIAL_ALLOCATION),
            allocation_decay_rate: Rate::saturating_from_ppm(DEFAULT_ALLOCATION_DECAY_PPM),
            allocation_decay_period: DEFAULT_ALLOCATION_DECAY_PERIOD,
            engagement_decay_rate: Rate::saturating_from_ppm(DEFAULT_ENGAGEMENT_DECAY_PPM),
            engagement_decay_period: DEFAULT_ENGAGEMENT_DECAY_PERIOD,
            engagement_decay_cap: Rate::saturating_from_ppm(DEFAULT_ENGAGEMENT_DECAY_CAP_PPM),
            treasury_rate: Rate::saturating_from_ppm(DEFAULT_TREASURY_PPM),
            bonus_pool_start_cycle: DEFAULT_BONUS_POOL_START_CYCLE,
            bonus_pool_share: Rate::saturating_from_ppm(DEFAULT_BONUS_POOL_SHARE_PPM),
            supply_cap: Amount::from_micros(DEFAULT_SUPPLY_CAP),
            migration_amount: Amount::from_micros(DEFAULT_MIGRATION_AMOUNT),
        }
    }
}

impl EmissionsConfig {
    /// Check the parameters before any cycle is generated.
    ///
    /// Rates are within `[0, 1]` by construction. A configuration whose cap
    /// admits no cycle at all is still valid; only `supply_cap <=
    /// migration_amount` is rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = Amount::from_micros(MAX_SUPPLY_CAP);

        if self.initial_allocation.is_zero() {
            return Err(ConfigError::ZeroInitialAllocation);
        }
        if self.initial_allocation > max {
            return Err(ConfigError::AboveMaximum {
                field: "initial_allocation",
                max: max.to_string(),
            });
        }
        if self.allocation_decay_period == 0 {
            return Err(ConfigError::ZeroPeriod {
                field: "allocation_decay_period",
            });
        }
        if self.engagement_decay_period == 0 {
            return Err(ConfigError::ZeroPeriod {
                field: "engagement_decay_period",
            });
        }
        if self.allocation_decay_rate == Rate::ONE {
            return Err(ConfigError::FullAllocationDecay);
        }
        if self.bonus_pool_start_cycle == 0 {
            return Err(ConfigError::ZeroBonusPoolStart);
        }
        if self.supply_cap > max {
            return Err(ConfigError::AboveMaximum {
                field: "supply_cap",
                max: max.to_string(),
            });
        }
        if self.supply_cap <= self.migration_amount {
            return Err(ConfigError::CapNotAboveMigration {
                cap: self.supply_cap.to_string(),
                migration: self.migration_amount.to_string(),
            });
        }
        Ok(())
    }

    /// Load from defaults, then `path` (or the default config file if it
    /// exists), then `EMIT_*` environment variables. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_vars(path, process_env())
    }

    /// [`load`](Self::load) reading overrides from `vars` instead of the
    /// process environment.
    pub fn load_with_vars<I>(path: Option<&Path>, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };
        Self::load_from(file.as_deref(), environment(vars))
    }

    /// [`load`](Self::load) with an explicit environment source.
    pub fn load_from(path: Option<&Path>, env: config::Environment) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(p) = path {
            debug!(path = %p.display(), "loading emissions config file");
            builder = builder.add_source(config::File::from(p).required(true));
        }
        let cfg: Self = builder
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// An environment source holding only the `EMIT_*` entries of `vars` that
/// name a field. Other `EMIT_*` variables are ignored.
pub fn environment<I>(vars: I) -> config::Environment
where
    I: IntoIterator<Item = (String, String)>,
{
    let known: config::Map<String, String> = vars
        .into_iter()
        .filter(|(key, _)| field_of(key).is_some())
        .collect();
    config::Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .source(Some(known))
}

/// The process environment, skipping entries that are not valid UTF-8.
pub fn process_env() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

fn field_of(key: &str) -> Option<&'static str> {
    let name = key
        .strip_prefix(ENV_PREFIX)?
        .strip_prefix('_')?
        .to_ascii_lowercase();
    FIELDS.iter().copied().find(|f| *f == name)
}

/// `<config_dir>/emit/emissions.toml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("emit").join(DEFAULT_CONFIG_FILE))
}
