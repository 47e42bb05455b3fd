pub mod calculator;
pub mod score_type;
pub mod sheet;

pub use calculator::{compute_scores, score_for, validate_dice, ScoreTable, DICE_COUNT};
pub use score_type::{ScoreType, SCORE_TYPE_COUNT};
pub use sheet::{Score, ScoreSheet};
