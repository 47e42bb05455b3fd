use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use uuid::Uuid;

use super::score_type::{ScoreType, SCORE_TYPE_COUNT};
use crate::config::ScoringRules;
use crate::game::errors::GameError;

/// A claimed category on a score sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: String,
    #[serde(rename = "type")]
    pub score_type: ScoreType,
    pub value: u32,
    pub user_id: String,
    pub score_sheet_id: String,
}

/// One player's record of claimed categories in one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSheet {
    pub id: String,
    pub game_id: String,
    pub user_id: String,
    scores: Vec<Score>,
}

impl ScoreSheet {
    pub fn new(game_id: &str, user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            game_id: game_id.to_string(),
            user_id: user_id.to_string(),
            scores: Vec::new(),
        }
    }

    /// Claims a category. The sheet is left untouched if it was already claimed.
    pub fn record_score(&mut self, score_type: ScoreType, value: u32) -> Result<&Score, GameError> {
        if self.has_scored(score_type) {
            return Err(GameError::CategoryAlreadyScored(score_type));
        }

        self.scores.push(Score {
            id: Uuid::new_v4().to_string(),
            score_type,
            value,
            user_id: self.user_id.clone(),
            score_sheet_id: self.id.clone(),
        });

        Ok(&self.scores[self.scores.len() - 1])
    }

    pub fn has_scored(&self, score_type: ScoreType) -> bool {
        self.scores.iter().any(|s| s.score_type == score_type)
    }

    pub fn value_of(&self, score_type: ScoreType) -> Option<u32> {
        self.scores
            .iter()
            .find(|s| s.score_type == score_type)
            .map(|s| s.value)
    }

    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    /// Categories still available, in sheet order
    pub fn open_categories(&self) -> Vec<ScoreType> {
        ScoreType::iter().filter(|t| !self.has_scored(*t)).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.scores.len() == SCORE_TYPE_COUNT
    }

    pub fn upper_section_total(&self) -> u32 {
        self.scores
            .iter()
            .filter(|s| s.score_type.is_upper_section())
            .map(|s| s.value)
            .sum()
    }

    /// Sum of recorded values plus the upper bonus when the rules enable one
    pub fn total_score(&self, rules: &ScoringRules) -> u32 {
        let base: u32 = self.scores.iter().map(|s| s.value).sum();
        let bonus = match rules.upper_bonus {
            Some(bonus) if self.upper_section_total() >= bonus.threshold => bonus.points,
            _ => 0,
        };
        base + bonus
    }
}
