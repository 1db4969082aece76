use crate::{ConfigError, PayoutTable, StageRules};
use serde::{Deserialize, Serialize};

/// What a guess names: a direction, or a direction plus the drawn card's suit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Direction,
    DirectionAndSuit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameRules {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub granularity: Granularity,
    /// Stage 1 first; later entries are continuation stages.
    pub stages: Vec<StageRules>,
}

impl GameRules {
    pub fn high_low_plus() -> Self {
        Self {
            id: "high-low-plus".to_string(),
            display_name: "High-Low Challenge+ (Whole-Number Version)".to_string(),
            granularity: Granularity::Direction,
            stages: vec![StageRules {
                cost: 2,
                payouts: PayoutTable {
                    higher_lower: [1, 2, 2, 3, 3, 3, 4, 3, 3, 3, 2, 2, 1],
                    tie: 8,
                },
            }],
        }
    }

    pub fn high_low_double() -> Self {
        let mut rules = Self::high_low_plus();
        rules.id = "high-low-double".to_string();
        rules.display_name = "High-Low Double Up (Two-Stage Version)".to_string();
        rules.stages.push(StageRules {
            cost: 2,
            payouts: PayoutTable {
                higher_lower: [2, 3, 3, 4, 4, 4, 5, 4, 4, 4, 3, 3, 2],
                tie: 12,
            },
        });
        rules
    }

    pub fn high_low_suited() -> Self {
        Self {
            id: "high-low-suited".to_string(),
            display_name: "High-Low Suited (Direction and Suit)".to_string(),
            granularity: Granularity::DirectionAndSuit,
            stages: vec![StageRules {
                cost: 2,
                payouts: PayoutTable {
                    higher_lower: [4, 8, 8, 12, 12, 12, 16, 12, 12, 12, 8, 8, 4],
                    tie: 40,
                },
            }],
        }
    }

    pub fn preset(id: &str) -> Option<Self> {
        match id {
            "high-low-plus" | "plus" => Some(Self::high_low_plus()),
            "high-low-double" | "double" => Some(Self::high_low_double()),
            "high-low-suited" | "suited" => Some(Self::high_low_suited()),
            _ => None,
        }
    }

    pub fn preset_ids() -> &'static [&'static str] {
        &["high-low-plus", "high-low-double", "high-low-suited"]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stages.is_empty() {
            return Err(ConfigError::InvalidRules(format!(
                "{} defines no stages",
                self.id
            )));
        }
        if let Some(index) = self.stages.iter().position(|stage| stage.cost == 0) {
            return Err(ConfigError::InvalidRules(format!(
                "{} stage {} has zero cost",
                self.id,
                index + 1
            )));
        }
        Ok(())
    }

    pub fn stage(&self, index: usize) -> Option<&StageRules> {
        self.stages.get(index)
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Reference card plus one reveal per stage.
    pub fn cards_per_round(&self) -> usize {
        self.stages.len() + 1
    }

    pub fn entry_cost(&self) -> u32 {
        self.stages.first().map(|stage| stage.cost).unwrap_or(0)
    }
}

/// Flat stake and return for the dice game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiceRules {
    pub cost: u32,
    pub payout: u32,
}

impl Default for DiceRules {
    fn default() -> Self {
        Self { cost: 1, payout: 2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for id in GameRules::preset_ids() {
            let rules = GameRules::preset(id).expect("preset");
            assert_eq!(rules.validate(), Ok(()));
            assert_eq!(rules.entry_cost(), 2);
        }
    }

    #[test]
    fn double_has_continuation_stage() {
        let rules = GameRules::high_low_double();
        assert_eq!(rules.stage_count(), 2);
        assert_eq!(rules.cards_per_round(), 3);
        assert_eq!(rules.stages[1].payouts.tie, 12);
    }

    #[test]
    fn rejects_empty_rules() {
        let mut rules = GameRules::high_low_plus();
        rules.stages.clear();
        assert!(matches!(rules.validate(), Err(ConfigError::InvalidRules(_))));
    }

    #[test]
    fn parses_rules_from_json() {
        let body = r#"{
            "id": "custom",
            "display_name": "Custom",
            "stages": [
                {"cost": 3, "payouts": {"higher_lower": [1,1,1,1,1,1,1,1,1,1,1,1,1], "tie": 9}}
            ]
        }"#;
        let rules: GameRules = serde_json::from_str(body).expect("parse");
        assert_eq!(rules.granularity, Granularity::Direction);
        assert_eq!(rules.entry_cost(), 3);
    }
}
