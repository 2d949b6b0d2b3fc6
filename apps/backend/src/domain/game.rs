//! Authoritative game state as persisted by the store.
//!
//! Field names on the wire match the persisted schema exactly; the richer
//! enums here replace the stringly-typed encoding of the original document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lifecycle of a game. Only ever advances:
/// pending -> running -> {redwon, bluewon}.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Pending,
    Running,
    RedWon,
    BlueWon,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::RedWon | GameStatus::BlueWon)
    }
}

/// Whose turn it is. Meaningful only while the game is running; `Over` the
/// instant a terminal status is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    #[default]
    #[serde(rename = "")]
    NotStarted,
    Red,
    Blue,
    Over,
}

/// One of the two playing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn other(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn turn(self) -> Turn {
        match self {
            Team::Red => Turn::Red,
            Team::Blue => Turn::Blue,
        }
    }

    pub fn color(self) -> CardColor {
        match self {
            Team::Red => CardColor::Red,
            Team::Blue => CardColor::Blue,
        }
    }

    pub fn won(self) -> GameStatus {
        match self {
            Team::Red => GameStatus::RedWon,
            Team::Blue => GameStatus::BlueWon,
        }
    }
}

/// Card ownership. The empty string is the persisted encoding for neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    #[default]
    #[serde(rename = "")]
    Neutral,
    Red,
    Blue,
    Black,
}

/// One word-slot on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Board position, 0..=24.
    pub index: usize,
    pub belongs_to: CardColor,
    pub guessed: bool,
}

/// The full persisted game document.
///
/// Maps are keyed by playerID (teams, players) or word (cards); insertion
/// order is irrelevant and they serialize as JSON objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Game {
    pub id: String,
    pub status: GameStatus,
    /// playerID -> display name, for every participant.
    pub players: BTreeMap<String, String>,
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// playerID -> display name for members of each side. Disjoint.
    pub team_red: BTreeMap<String, String>,
    pub team_blue: BTreeMap<String, String>,
    /// Display name of the role holder, or empty if unfilled.
    pub team_red_spy: String,
    pub team_blue_spy: String,
    pub team_red_guesser: String,
    pub team_blue_guesser: String,
    pub whose_turn: Turn,
    /// word -> card; exactly 25 entries once the game is running.
    pub cards: BTreeMap<String, Card>,
    pub last_card_guessed: String,
    pub last_card_guessed_by: String,
    pub last_card_guessed_correctly: bool,
    /// Unix seconds; set by the store on every mutation.
    pub updated_at: i64,
}

impl Game {
    pub fn new(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn name_of(&self, player_id: &str) -> Option<&str> {
        self.players.get(player_id).map(String::as_str)
    }

    pub fn is_member(&self, player_id: &str) -> bool {
        self.players.contains_key(player_id)
    }

    /// The side this player currently belongs to, if any.
    pub fn team_of(&self, player_id: &str) -> Option<Team> {
        if self.team_red.contains_key(player_id) {
            Some(Team::Red)
        } else if self.team_blue.contains_key(player_id) {
            Some(Team::Blue)
        } else {
            None
        }
    }

    /// Display name of the guesser for a side, or empty if unfilled.
    pub fn guesser_of(&self, team: Team) -> &str {
        match team {
            Team::Red => &self.team_red_guesser,
            Team::Blue => &self.team_blue_guesser,
        }
    }

    /// True iff the caller holds the guesser role for the side whose turn
    /// it currently is.
    pub fn can_guess(&self, player_id: &str) -> bool {
        let Some(team) = self.team_of(player_id) else {
            return false;
        };
        if self.whose_turn != team.turn() {
            return false;
        }
        let name = match team {
            Team::Red => self.team_red.get(player_id),
            Team::Blue => self.team_blue.get(player_id),
        };
        matches!(name, Some(n) if n == self.guesser_of(team) && !n.is_empty())
    }

    /// Ending the turn takes the same authority as guessing.
    pub fn can_end_turn(&self, player_id: &str) -> bool {
        self.can_guess(player_id)
    }

    /// All four roles (two spies, two guessers) are filled.
    pub fn roles_filled(&self) -> bool {
        !self.team_red_spy.is_empty()
            && !self.team_blue_spy.is_empty()
            && !self.team_red_guesser.is_empty()
            && !self.team_blue_guesser.is_empty()
    }
}
