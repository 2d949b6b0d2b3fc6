//! Shared fixtures for domain tests.

use std::collections::BTreeMap;

use crate::domain::game::{Card, CardColor, Game, GameStatus, Turn};

/// Pending game with four players, teams split, and all roles filled:
/// red = Ann (spy) + Bo (guesser), blue = Cy (spy) + Di (guesser).
/// p1/Ann is the creator.
pub fn ready_game() -> Game {
    let mut game = Game::new("g1".to_string());
    for (id, name) in [("p1", "Ann"), ("p2", "Bo"), ("p3", "Cy"), ("p4", "Di")] {
        game.players.insert(id.to_string(), name.to_string());
    }
    game.creator_id = "p1".to_string();
    game.team_red.insert("p1".to_string(), "Ann".to_string());
    game.team_red.insert("p2".to_string(), "Bo".to_string());
    game.team_blue.insert("p3".to_string(), "Cy".to_string());
    game.team_blue.insert("p4".to_string(), "Di".to_string());
    game.team_red_spy = "Ann".to_string();
    game.team_red_guesser = "Bo".to_string();
    game.team_blue_spy = "Cy".to_string();
    game.team_blue_guesser = "Di".to_string();
    game
}

/// Deterministic 25-card board: w00 black, w01..w08 red, w09..w17 blue,
/// w18..w24 neutral.
pub fn fixed_board() -> BTreeMap<String, Card> {
    let mut cards = BTreeMap::new();
    for i in 0..25 {
        let belongs_to = match i {
            0 => CardColor::Black,
            1..=8 => CardColor::Red,
            9..=17 => CardColor::Blue,
            _ => CardColor::Neutral,
        };
        cards.insert(
            format!("w{i:02}"),
            Card {
                index: i,
                belongs_to,
                guessed: false,
            },
        );
    }
    cards
}

/// Running game on the fixed board, blue to act first.
pub fn running_game() -> Game {
    let mut game = ready_game();
    game.status = GameStatus::Running;
    game.whose_turn = Turn::Blue;
    game.cards = fixed_board();
    game
}
