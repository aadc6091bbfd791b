//! Case opening configuration

use serde::{Deserialize, Serialize};

use sz_core::{Credits, SzError, SzResult};
use sz_stage::TimingConfig;

use crate::catalog::Catalog;

/// Complete case configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasesConfig {
    pub initial_credit: Credits,
    /// Most boxes opened by one command
    pub max_open: usize,
    /// Items drawn per side in a battle
    pub battle_draws: usize,
    pub catalog: Catalog,
    pub timing: TimingConfig,
}

impl Default for CasesConfig {
    fn default() -> Self {
        Self {
            initial_credit: Credits::from_whole(1000),
            max_open: 5,
            battle_draws: 3,
            catalog: Catalog::builtin(),
            timing: TimingConfig::normal(),
        }
    }
}

impl CasesConfig {
    /// Defaults with zero reveal delays
    pub fn instant() -> Self {
        Self {
            timing: TimingConfig::instant(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SzResult<()> {
        if self.max_open == 0 {
            return Err(SzError::InvalidConfig("max_open must be at least 1".into()));
        }
        if self.battle_draws == 0 {
            return Err(SzError::InvalidConfig("battle_draws must be at least 1".into()));
        }
        if self.max_open > u8::MAX as usize || self.battle_draws * 2 > u8::MAX as usize {
            return Err(SzError::InvalidConfig("too many reels for one reveal".into()));
        }
        self.catalog.validate()
    }
}
