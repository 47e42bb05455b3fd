// A GameSession is one Maksi-Jatsi game: its roster in join order, the turn
// state machine, one score sheet per player and the dice of the current turn.
//
// Every mutation validates everything first and only then changes state, so an
// error never leaves a half-applied turn behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dice::{DiceProvider, DiceThrow};
use super::errors::GameError;
use super::scoring::{score_for, validate_dice, ScoreSheet, ScoreType, DICE_COUNT};
use super::turn::{GameState, TurnNumber, TurnStateMachine};
use crate::config::ScoringRules;

const MAX_NAME_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: String,
    pub name: String,
    pub host_id: Option<String>,
    pub created_at: DateTime<Utc>,
    users: Vec<String>, // Join order is turn order
    #[serde(flatten)]
    turn: TurnStateMachine,
    score_sheets: Vec<ScoreSheet>,
    dice: Vec<u8>, // Faces currently on the table for the player in turn
    /// Bumped by the repository on every successful save
    pub version: u64,
}

/// A player's position in a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub user_id: String,
    pub total: u32,
    pub categories_scored: usize,
}

impl GameSession {
    /// Creates an empty joinable game hosted by `host_id`. The host still has to join.
    pub fn new(name: &str, host_id: &str) -> Result<Self, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidName("name cannot be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(GameError::InvalidName(format!(
                "name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            host_id: Some(host_id.to_string()),
            created_at: Utc::now(),
            users: vec![],
            turn: TurnStateMachine::new(),
            score_sheets: vec![],
            dice: vec![],
            version: 0,
        })
    }

    pub fn state(&self) -> GameState {
        self.turn.state()
    }

    pub fn turn_number(&self) -> Option<TurnNumber> {
        self.turn.turn_number()
    }

    pub fn whos_turn(&self) -> Option<&str> {
        self.turn.whos_turn()
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn dice(&self) -> &[u8] {
        &self.dice
    }

    pub fn score_sheets(&self) -> &[ScoreSheet] {
        &self.score_sheets
    }

    pub fn sheet_for(&self, user_id: &str) -> Option<&ScoreSheet> {
        self.score_sheets.iter().find(|s| s.user_id == user_id)
    }

    pub fn has_player(&self, user_id: &str) -> bool {
        self.users.iter().any(|u| u == user_id)
    }

    pub fn is_host(&self, user_id: &str) -> bool {
        self.host_id.as_deref() == Some(user_id)
    }

    /// Adds a player and their score sheet. Returns false if they were already in.
    pub fn join(&mut self, user_id: &str) -> Result<bool, GameError> {
        self.turn.ensure_joinable()?;

        if self.has_player(user_id) {
            return Ok(false);
        }

        self.users.push(user_id.to_string());
        self.score_sheets.push(ScoreSheet::new(&self.id, user_id));
        Ok(true)
    }

    /// Removes a player before the game starts. The host role passes to the
    /// earliest remaining player.
    pub fn leave(&mut self, user_id: &str) -> Result<(), GameError> {
        match self.state() {
            GameState::Joinable => {}
            GameState::Ongoing => return Err(GameError::GameAlreadyStarted),
            GameState::Finished => return Err(GameError::GameFinished),
        }
        if !self.has_player(user_id) {
            return Err(GameError::NotInGame);
        }

        self.users.retain(|u| u != user_id);
        self.score_sheets.retain(|s| s.user_id != user_id);

        if self.is_host(user_id) {
            self.host_id = self.users.first().cloned();
        }
        Ok(())
    }

    pub fn start(&mut self, caller_id: &str) -> Result<(), GameError> {
        self.turn.ensure_not_finished()?;
        if !self.is_host(caller_id) {
            return Err(GameError::NotHost);
        }
        self.turn.start(&self.users)
    }

    /// Throws `number_of_dice` dice and keeps `hold` from the current dice.
    ///
    /// Held and thrown dice always add up to a full hand; the first throw of a
    /// turn holds nothing.
    pub fn throw_dice(
        &mut self,
        caller_id: &str,
        number_of_dice: i64,
        hold: &[u8],
        provider: &dyn DiceProvider,
    ) -> Result<DiceThrow, GameError> {
        self.turn.ensure_turn(caller_id)?;
        self.turn.peek_next_throw()?;

        if number_of_dice < 1 || number_of_dice > DICE_COUNT as i64 {
            return Err(GameError::InvalidThrow(format!(
                "number of dice must be between 1 and {}, got {}",
                DICE_COUNT, number_of_dice
            )));
        }
        let number_of_dice = number_of_dice as usize;

        if self.turn_number().is_none() && !hold.is_empty() {
            return Err(GameError::InvalidThrow(
                "cannot hold dice before the first throw".to_string(),
            ));
        }
        if hold.len() + number_of_dice != DICE_COUNT {
            return Err(GameError::InvalidThrow(format!(
                "held ({}) and thrown ({}) dice must add up to {}",
                hold.len(),
                number_of_dice,
                DICE_COUNT
            )));
        }
        if !is_sub_multiset(hold, &self.dice) {
            return Err(GameError::InvalidThrow(
                "held dice are not on the table".to_string(),
            ));
        }

        let thrown = provider.throw(number_of_dice as u8);
        if thrown.len() != number_of_dice {
            return Err(GameError::InvalidDice(format!(
                "provider returned {} dice, expected {}",
                thrown.len(),
                number_of_dice
            )));
        }
        validate_dice(&thrown.values)?;

        self.turn.register_throw()?;
        self.dice = hold.iter().chain(thrown.values.iter()).copied().collect();
        Ok(thrown)
    }

    /// Claims `score_type` for the current dice and passes the turn on.
    /// Returns the points awarded.
    pub fn end_turn(
        &mut self,
        caller_id: &str,
        score_type: ScoreType,
        rules: &ScoringRules,
    ) -> Result<u32, GameError> {
        self.turn.ensure_turn(caller_id)?;
        if self.turn_number().is_none() {
            return Err(GameError::NoDiceThrown);
        }

        let points = score_for(score_type, &self.dice, rules)?;
        let sheet = self
            .score_sheets
            .iter_mut()
            .find(|s| s.user_id == caller_id)
            .ok_or(GameError::NotInGame)?;
        sheet.record_score(score_type, points)?;

        self.dice.clear();
        if self.score_sheets.iter().all(|s| s.is_complete()) {
            self.turn.finish();
        } else {
            self.turn.advance(&self.users);
        }
        Ok(points)
    }

    /// Ends the game early. Only the host may do this.
    pub fn abandon(&mut self, caller_id: &str) -> Result<(), GameError> {
        self.turn.ensure_not_finished()?;
        if !self.is_host(caller_id) {
            return Err(GameError::NotHost);
        }
        self.turn.finish();
        self.dice.clear();
        Ok(())
    }

    /// Totals per player, best first
    pub fn standings(&self, rules: &ScoringRules) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .score_sheets
            .iter()
            .map(|sheet| Standing {
                user_id: sheet.user_id.clone(),
                total: sheet.total_score(rules),
                categories_scored: sheet.scores().len(),
            })
            .collect();
        standings.sort_by(|a, b| b.total.cmp(&a.total));
        standings
    }
}

fn is_sub_multiset(part: &[u8], whole: &[u8]) -> bool {
    let mut remaining = whole.to_vec();
    part.iter().all(|die| match remaining.iter().position(|d| d == die) {
        Some(pos) => {
            remaining.swap_remove(pos);
            true
        }
        None => false,
    })
}
