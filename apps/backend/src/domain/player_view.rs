//! Role-filtered projections of a game snapshot.
//!
//! Every outbound push is one of three views of the same snapshot: the base
//! view (spectators), the guesser view, or the spy view. The wire shape is
//! PascalCase, matching what clients already consume; the persisted-schema
//! encoding never leaves the store layer.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::MIN_PLAYERS;
use crate::domain::game::{CardColor, Game, GameStatus, Team, Turn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CardView {
    pub index: usize,
    pub belongs_to: CardColor,
    pub guessed: bool,
}

/// What every participant may see. Card ownership is blanked until the
/// card is guessed; guesser roles stay hidden while the game is pending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseGameView {
    #[serde(rename = "ID")]
    pub id: String,
    pub status: GameStatus,
    /// Display names only; playerIDs never leave the server.
    pub players: Vec<String>,
    pub team_red: Vec<String>,
    pub team_blue: Vec<String>,
    pub team_red_spy: String,
    pub team_blue_spy: String,
    pub team_red_guesser: String,
    pub team_blue_guesser: String,
    pub whose_turn: Turn,
    pub cards: BTreeMap<String, CardView>,
    pub last_card_guessed: String,
    pub last_card_guessed_by: String,
    pub last_card_guessed_correctly: bool,
}

/// Base view plus the caller's personal fields. Spectators get this with
/// the personal fields left empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerGameView {
    pub you: String,
    pub you_own_game: bool,
    pub your_turn: bool,
    pub game_can_start: bool,
    pub base_game: BaseGameView,
}

/// The spectator projection.
pub fn base_view(game: &Game) -> BaseGameView {
    let cards = game
        .cards
        .iter()
        .map(|(word, card)| {
            let belongs_to = if card.guessed {
                card.belongs_to
            } else {
                CardColor::Neutral
            };
            (
                word.clone(),
                CardView {
                    index: card.index,
                    belongs_to,
                    guessed: card.guessed,
                },
            )
        })
        .collect();

    let (team_red_guesser, team_blue_guesser) = if game.status == GameStatus::Pending {
        (String::new(), String::new())
    } else {
        (
            game.team_red_guesser.clone(),
            game.team_blue_guesser.clone(),
        )
    };

    BaseGameView {
        id: game.id.clone(),
        status: game.status,
        players: game.players.values().cloned().collect(),
        team_red: game.team_red.values().cloned().collect(),
        team_blue: game.team_blue.values().cloned().collect(),
        team_red_spy: game.team_red_spy.clone(),
        team_blue_spy: game.team_blue_spy.clone(),
        team_red_guesser,
        team_blue_guesser,
        whose_turn: game.whose_turn,
        cards,
        last_card_guessed: game.last_card_guessed.clone(),
        last_card_guessed_by: game.last_card_guessed_by.clone(),
        last_card_guessed_correctly: game.last_card_guessed_correctly,
    }
}

pub fn spectator_view(game: &Game) -> PlayerGameView {
    PlayerGameView {
        you: String::new(),
        you_own_game: false,
        your_turn: false,
        game_can_start: false,
        base_game: base_view(game),
    }
}

/// The projection for a registered player: spy view if the caller holds a
/// spy role, guesser view otherwise.
pub fn view_for_player(game: &Game, player_id: &str, player_limit: usize) -> PlayerGameView {
    let you = game.name_of(player_id).unwrap_or_default().to_string();
    let is_spy = !you.is_empty() && (you == game.team_red_spy || you == game.team_blue_spy);

    let mut base = base_view(game);
    if is_spy {
        // Spies see the whole board, guessed or not.
        for (word, card) in &game.cards {
            if let Some(view) = base.cards.get_mut(word) {
                view.belongs_to = card.belongs_to;
            }
        }
    }

    let your_turn = match game.team_of(player_id) {
        Some(Team::Red) => game.whose_turn == Turn::Red,
        Some(Team::Blue) => game.whose_turn == Turn::Blue,
        None => false,
    };

    PlayerGameView {
        you,
        you_own_game: !game.creator_id.is_empty() && game.creator_id == player_id,
        your_turn,
        game_can_start: game.players.len() >= MIN_PLAYERS && game.players.len() <= player_limit,
        base_game: base,
    }
}
