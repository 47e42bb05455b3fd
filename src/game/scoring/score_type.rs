use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// The 20 Maksi-Jatsi scoring categories.
///
/// Variant names are the stored/wire tokens and must not be renamed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
)]
pub enum ScoreType {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    Pair,
    TwoPairs,
    ThreePairs,
    ThreeOfAKind,
    FourOfAKind,
    FiveOfAKind,
    SmallStraight,
    LargeStraight,
    FullStraight,
    FullHouse,
    Villa,
    Tower,
    Chance,
    MaxiYatzy,
}

/// Number of categories on a complete score sheet
pub const SCORE_TYPE_COUNT: usize = 20;

impl ScoreType {
    /// All categories in sheet order
    pub fn all() -> impl Iterator<Item = ScoreType> {
        ScoreType::iter()
    }

    /// The die face counted by an upper-section category
    pub fn face(&self) -> Option<u8> {
        match self {
            ScoreType::Ones => Some(1),
            ScoreType::Twos => Some(2),
            ScoreType::Threes => Some(3),
            ScoreType::Fours => Some(4),
            ScoreType::Fives => Some(5),
            ScoreType::Sixes => Some(6),
            _ => None,
        }
    }

    pub fn is_upper_section(&self) -> bool {
        self.face().is_some()
    }
}
