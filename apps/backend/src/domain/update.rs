//! Typed partial-field updates, the unit of atomic persistence.

use std::collections::BTreeMap;

use crate::domain::game::{Card, Game, GameStatus, Turn};

/// A partial set of field writes for one game. Transitions produce one of
/// these; the store applies every present field in a single atomic call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameUpdate {
    pub status: Option<GameStatus>,
    pub whose_turn: Option<Turn>,
    pub players: Option<BTreeMap<String, String>>,
    pub creator_id: Option<String>,
    pub team_red: Option<BTreeMap<String, String>>,
    pub team_blue: Option<BTreeMap<String, String>>,
    pub team_red_spy: Option<String>,
    pub team_blue_spy: Option<String>,
    pub team_red_guesser: Option<String>,
    pub team_blue_guesser: Option<String>,
    pub cards: Option<BTreeMap<String, Card>>,
    pub last_card_guessed: Option<String>,
    pub last_card_guessed_by: Option<String>,
    pub last_card_guessed_correctly: Option<bool>,
}

impl GameUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the present fields to a snapshot. `updatedAt` is the store's
    /// responsibility, not part of the update.
    pub fn apply(&self, game: &mut Game) {
        if let Some(status) = self.status {
            game.status = status;
        }
        if let Some(whose_turn) = self.whose_turn {
            game.whose_turn = whose_turn;
        }
        if let Some(players) = &self.players {
            game.players = players.clone();
        }
        if let Some(creator_id) = &self.creator_id {
            game.creator_id = creator_id.clone();
        }
        if let Some(team_red) = &self.team_red {
            game.team_red = team_red.clone();
        }
        if let Some(team_blue) = &self.team_blue {
            game.team_blue = team_blue.clone();
        }
        if let Some(name) = &self.team_red_spy {
            game.team_red_spy = name.clone();
        }
        if let Some(name) = &self.team_blue_spy {
            game.team_blue_spy = name.clone();
        }
        if let Some(name) = &self.team_red_guesser {
            game.team_red_guesser = name.clone();
        }
        if let Some(name) = &self.team_blue_guesser {
            game.team_blue_guesser = name.clone();
        }
        if let Some(cards) = &self.cards {
            game.cards = cards.clone();
        }
        if let Some(word) = &self.last_card_guessed {
            game.last_card_guessed = word.clone();
        }
        if let Some(by) = &self.last_card_guessed_by {
            game.last_card_guessed_by = by.clone();
        }
        if let Some(correctly) = self.last_card_guessed_correctly {
            game.last_card_guessed_correctly = correctly;
        }
    }

    /// Present fields as (persisted field name, JSON-encoded value) pairs.
    pub fn field_pairs(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.status {
            pairs.push(("status", serde_json::to_string(v)?));
        }
        if let Some(v) = &self.whose_turn {
            pairs.push(("whoseTurn", serde_json::to_string(v)?));
        }
        if let Some(v) = &self.players {
            pairs.push(("players", serde_json::to_string(v)?));
        }
        if let Some(v) = &self.creator_id {
            pairs.push(("creatorID", serde_json::to_string(v)?));
        }
        if let Some(v) = &self.team_red {
            pairs.push(("teamRed", serde_json::to_string(v)?));
        }
        if let Some(v) = &self.team_blue {
            pairs.push(("teamBlue", serde_json::to_string(v)?));
        }
        if let Some(v) = &self.team_red_spy {
            pairs.push(("teamRedSpy", serde_json::to_string(v)?));
        }
        if let Some(v) = &self.team_blue_spy {
            pairs.push(("teamBlueSpy", serde_json::to_string(v)?));
        }
        if let Some(v) = &self.team_red_guesser {
            pairs.push(("teamRedGuesser", serde_json::to_string(v)?));
        }
        if let Some(v) = &self.team_blue_guesser {
            pairs.push(("teamBlueGuesser", serde_json::to_string(v)?));
        }
        if let Some(v) = &self.cards {
            pairs.push(("cards", serde_json::to_string(v)?));
        }
        if let Some(v) = &self.last_card_guessed {
            pairs.push(("lastCardGuessed", serde_json::to_string(v)?));
        }
        if let Some(v) = &self.last_card_guessed_by {
            pairs.push(("lastCardGuessedBy", serde_json::to_string(v)?));
        }
        if let Some(v) = self.last_card_guessed_correctly {
            pairs.push(("lastCardGuessedCorrectly", serde_json::to_string(&v)?));
        }
        Ok(pairs)
    }
}
