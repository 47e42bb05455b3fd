use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use super::score_type::ScoreType;
use crate::config::{ComboSelection, ScoringRules};
use crate::game::errors::GameError;

/// Dice in a full Maksi-Jatsi hand
pub const DICE_COUNT: usize = 6;

/// Achievable points per category, always one entry per ScoreType
pub type ScoreTable = BTreeMap<ScoreType, u32>;

/// Occurrences of each face, indexed 1..=6
type FaceCounts = [u8; 7];

/// Scores every category for the given dice.
///
/// Accepts up to six dice with faces 1..=6. Categories the dice do not
/// satisfy are present with a value of zero.
pub fn compute_scores(dice: &[u8], rules: &ScoringRules) -> Result<ScoreTable, GameError> {
    validate_dice(dice)?;

    let counts = face_counts(dice);
    let sum: u32 = dice.iter().map(|&d| d as u32).sum();

    Ok(ScoreType::iter()
        .map(|score_type| (score_type, score_category(score_type, &counts, sum, rules)))
        .collect())
}

/// Points for a single category. Dice must already be validated.
pub fn score_for(score_type: ScoreType, dice: &[u8], rules: &ScoringRules) -> Result<u32, GameError> {
    validate_dice(dice)?;
    let sum: u32 = dice.iter().map(|&d| d as u32).sum();
    Ok(score_category(score_type, &face_counts(dice), sum, rules))
}

pub fn validate_dice(dice: &[u8]) -> Result<(), GameError> {
    if dice.len() > DICE_COUNT {
        return Err(GameError::InvalidDice(format!(
            "expected at most {} dice, got {}",
            DICE_COUNT,
            dice.len()
        )));
    }
    if let Some(bad) = dice.iter().find(|d| !(1..=6).contains(*d)) {
        return Err(GameError::InvalidDice(format!("face {} is out of range 1..=6", bad)));
    }
    Ok(())
}

fn face_counts(dice: &[u8]) -> FaceCounts {
    let mut counts = [0u8; 7];
    for &d in dice {
        counts[d as usize] += 1;
    }
    counts
}

fn score_category(score_type: ScoreType, counts: &FaceCounts, sum: u32, rules: &ScoringRules) -> u32 {
    let candidates: Vec<u32> = match score_type {
        ScoreType::Ones
        | ScoreType::Twos
        | ScoreType::Threes
        | ScoreType::Fours
        | ScoreType::Fives
        | ScoreType::Sixes => {
            let face = score_type.face().unwrap_or_default();
            return counts[face as usize] as u32 * face as u32;
        }
        ScoreType::Pair => groups(counts, &[2]),
        ScoreType::TwoPairs => groups(counts, &[2, 2]),
        ScoreType::ThreePairs => groups(counts, &[2, 2, 2]),
        ScoreType::ThreeOfAKind => groups(counts, &[3]),
        ScoreType::FourOfAKind => groups(counts, &[4]),
        ScoreType::FiveOfAKind => groups(counts, &[5]),
        ScoreType::SmallStraight => straight(counts, 1..=5),
        ScoreType::LargeStraight => straight(counts, 2..=6),
        ScoreType::FullStraight => straight(counts, 1..=6),
        ScoreType::FullHouse => groups(counts, &[3, 2]),
        ScoreType::Villa => fixed_or_sum(groups(counts, &[3, 3]), rules.villa_points),
        ScoreType::Tower => fixed_or_sum(groups(counts, &[4, 2]), rules.tower_points),
        ScoreType::Chance => return sum,
        ScoreType::MaxiYatzy => {
            if counts.iter().any(|&c| c as usize == DICE_COUNT) {
                return rules.maxi_yatzy_points;
            }
            vec![]
        }
    };

    let chosen = match rules.combo_selection {
        ComboSelection::Highest => candidates.into_iter().max(),
        ComboSelection::Lowest => candidates.into_iter().min(),
    };
    chosen.unwrap_or(0)
}

/// Points of every way to pick groups of the given sizes from distinct faces.
///
/// `[3, 2]` means a triple and a pair of a different face; the value of a
/// combination is the sum of the dice it uses.
fn groups(counts: &FaceCounts, sizes: &[u8]) -> Vec<u32> {
    let mut results = Vec::new();
    collect_groups(counts, sizes, &mut [false; 7], 0, &mut results);
    results
}

fn collect_groups(
    counts: &FaceCounts,
    sizes: &[u8],
    used: &mut [bool; 7],
    points: u32,
    results: &mut Vec<u32>,
) {
    let Some((&size, rest)) = sizes.split_first() else {
        results.push(points);
        return;
    };

    // Permutations of equal-sized groups are produced more than once; harmless for min/max.
    for face in 1..=6u8 {
        if used[face as usize] || counts[face as usize] < size {
            continue;
        }
        used[face as usize] = true;
        collect_groups(counts, rest, used, points + size as u32 * face as u32, results);
        used[face as usize] = false;
    }
}

fn straight(counts: &FaceCounts, faces: std::ops::RangeInclusive<u8>) -> Vec<u32> {
    if faces.clone().all(|f| counts[f as usize] >= 1) {
        vec![faces.map(|f| f as u32).sum()]
    } else {
        vec![]
    }
}

fn fixed_or_sum(candidates: Vec<u32>, fixed: Option<u32>) -> Vec<u32> {
    match fixed {
        Some(points) if !candidates.is_empty() => vec![points],
        _ => candidates,
    }
}
