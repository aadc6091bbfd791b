//! Stage — the semantic moments of a game round
//!
//! A Stage is not an animation. It marks the point at which a piece of the
//! settled outcome becomes visible to the caller.

use serde::{Deserialize, Serialize};

use sz_core::Credits;

/// Canonical reveal stage shared by slot, wheel and case games
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SLOT SPIN
    // ═══════════════════════════════════════════════════════════════════════
    /// Stake taken (or free spin consumed), reels start
    SpinStart {
        /// Free spin number within the bonus, if any
        #[serde(default)]
        free_spin: Option<u32>,
    },

    /// One reel stopped on its drawn symbols
    ReelStop {
        /// Which reel (0-indexed)
        reel_index: u8,
        /// Symbol indices, top to bottom
        #[serde(default)]
        symbols: Vec<u8>,
    },

    /// A free-spin reel was overwritten with the expanding symbol
    ReelExpand {
        reel_index: u8,
        symbol: u8,
    },

    /// Final grid is on screen, paylines are being evaluated
    EvaluateWins,

    /// One winning payline
    WinLineShow {
        line_index: u8,
        symbol: u8,
        count: u8,
        win: Credits,
    },

    /// Round settled and credited
    SpinEnd {
        total_win: Credits,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // FREE SPIN BONUS
    // ═══════════════════════════════════════════════════════════════════════
    /// Bonus started
    FeatureEnter {
        spins: u32,
        expanding_symbol: u8,
    },

    /// Bonus extended
    FeatureRetrigger {
        added: u32,
        total: u32,
    },

    /// Bonus finished, summary delivered
    FeatureExit {
        total_win: Credits,
        spins_played: u32,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // GAMBLE
    // ═══════════════════════════════════════════════════════════════════════
    GambleStart {
        amount: Credits,
    },

    GambleResult {
        won: bool,
        amount: Credits,
    },

    GambleEnd {
        collected: Credits,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // WHEEL
    // ═══════════════════════════════════════════════════════════════════════
    WheelSpinStart {
        total_staked: Credits,
    },

    WheelSettle {
        number: u8,
        payout: Credits,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // CASES
    // ═══════════════════════════════════════════════════════════════════════
    /// One case reel landed on its item
    CaseReelStop {
        /// Reel slot (player side first in battles)
        slot: u8,
        item_id: String,
        ticket: u32,
    },

    CasesRevealed {
        total_value: Credits,
    },

    BattleEnd {
        player_total: Credits,
        bot_total: Credits,
    },
}

/// Stage category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageCategory {
    Spin,
    Win,
    Feature,
    Gamble,
    Wheel,
    Cases,
}

impl Stage {
    /// Snake-case type name (matches the serde tag)
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart { .. } => "spin_start",
            Stage::ReelStop { .. } => "reel_stop",
            Stage::ReelExpand { .. } => "reel_expand",
            Stage::EvaluateWins => "evaluate_wins",
            Stage::WinLineShow { .. } => "win_line_show",
            Stage::SpinEnd { .. } => "spin_end",
            Stage::FeatureEnter { .. } => "feature_enter",
            Stage::FeatureRetrigger { .. } => "feature_retrigger",
            Stage::FeatureExit { .. } => "feature_exit",
            Stage::GambleStart { .. } => "gamble_start",
            Stage::GambleResult { .. } => "gamble_result",
            Stage::GambleEnd { .. } => "gamble_end",
            Stage::WheelSpinStart { .. } => "wheel_spin_start",
            Stage::WheelSettle { .. } => "wheel_settle",
            Stage::CaseReelStop { .. } => "case_reel_stop",
            Stage::CasesRevealed { .. } => "cases_revealed",
            Stage::BattleEnd { .. } => "battle_end",
        }
    }

    pub fn category(&self) -> StageCategory {
        match self {
            Stage::SpinStart { .. }
            | Stage::ReelStop { .. }
            | Stage::ReelExpand { .. }
            | Stage::EvaluateWins
            | Stage::SpinEnd { .. } => StageCategory::Spin,
            Stage::WinLineShow { .. } => StageCategory::Win,
            Stage::FeatureEnter { .. } | Stage::FeatureRetrigger { .. } | Stage::FeatureExit { .. } => {
                StageCategory::Feature
            }
            Stage::GambleStart { .. } | Stage::GambleResult { .. } | Stage::GambleEnd { .. } => {
                StageCategory::Gamble
            }
            Stage::WheelSpinStart { .. } | Stage::WheelSettle { .. } => StageCategory::Wheel,
            Stage::CaseReelStop { .. } | Stage::CasesRevealed { .. } | Stage::BattleEnd { .. } => {
                StageCategory::Cases
            }
        }
    }

    /// Reel stops are the only stages fast-forward shortens
    pub fn is_reel_stop(&self) -> bool {
        matches!(self, Stage::ReelStop { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_tag_matches_type_name() {
        let stages = vec![
            Stage::SpinStart { free_spin: None },
            Stage::ReelStop {
                reel_index: 2,
                symbols: vec![0, 5, 9],
            },
            Stage::EvaluateWins,
            Stage::WheelSettle {
                number: 7,
                payout: Credits::from_whole(10),
            },
        ];

        for stage in stages {
            let json = serde_json::to_value(&stage).unwrap();
            assert_eq!(json["type"], stage.type_name());
            let back: Stage = serde_json::from_value(json).unwrap();
            assert_eq!(back, stage);
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(Stage::EvaluateWins.category(), StageCategory::Spin);
        assert_eq!(
            Stage::FeatureExit {
                total_win: Credits::ZERO,
                spins_played: 10
            }
            .category(),
            StageCategory::Feature
        );
        assert!(
            Stage::ReelStop {
                reel_index: 0,
                symbols: vec![]
            }
            .is_reel_stop()
        );
        assert!(!Stage::EvaluateWins.is_reel_stop());
    }
}
