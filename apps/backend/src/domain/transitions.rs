//! Pure state transitions: `(snapshot, caller, args) -> Option<GameUpdate>`.
//!
//! `None` means the action is not permitted in the current state and must
//! be ignored without any visible effect; callers log it and move on.
//! Nothing here touches the store or the clock.

use rand::Rng;

use crate::config::MIN_PLAYERS;
use crate::domain::board::{generate_board, BLUE_CARDS, RED_CARDS};
use crate::domain::game::{Card, CardColor, Game, GameStatus, Team, Turn};
use crate::domain::update::GameUpdate;
use crate::domain::words::WordList;
use crate::error::AppError;

/// Target assignment for an UpdateTeam action. Observers join a side
/// without holding a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChoice {
    RedSpy,
    RedGuesser,
    BlueSpy,
    BlueGuesser,
    RedObserver,
    BlueObserver,
}

impl RoleChoice {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "red_spy" => Some(RoleChoice::RedSpy),
            "red_guesser" => Some(RoleChoice::RedGuesser),
            "blue_spy" => Some(RoleChoice::BlueSpy),
            "blue_guesser" => Some(RoleChoice::BlueGuesser),
            "red_observer" => Some(RoleChoice::RedObserver),
            "blue_observer" => Some(RoleChoice::BlueObserver),
            _ => None,
        }
    }

    pub fn team(self) -> Team {
        match self {
            RoleChoice::RedSpy | RoleChoice::RedGuesser | RoleChoice::RedObserver => Team::Red,
            RoleChoice::BlueSpy | RoleChoice::BlueGuesser | RoleChoice::BlueObserver => Team::Blue,
        }
    }
}

/// Move a pending game to running.
///
/// Requires: caller is the creator, at least four players, and all four
/// roles filled via prior UpdateTeam actions. Generates the board and hands
/// the first turn to blue.
pub fn start_game<R: Rng + ?Sized>(
    game: &Game,
    caller_id: &str,
    words: &WordList,
    rng: &mut R,
) -> Result<Option<GameUpdate>, AppError> {
    if game.status != GameStatus::Pending
        || game.players.len() < MIN_PLAYERS
        || game.creator_id.is_empty()
        || caller_id != game.creator_id
        || !game.roles_filled()
    {
        return Ok(None);
    }

    let cards = generate_board(words, rng)?;
    Ok(Some(GameUpdate {
        status: Some(GameStatus::Running),
        whose_turn: Some(Turn::Blue),
        cards: Some(cards),
        ..GameUpdate::default()
    }))
}

/// Assign a player (by display name) to a side and optionally a role.
///
/// Creator-only, pending-only. A player holds at most one role at a time:
/// any role the target currently holds is cleared before the new one is
/// assigned, and the target's team membership follows the chosen side.
pub fn update_teams(
    game: &Game,
    caller_id: &str,
    target_name: &str,
    role: RoleChoice,
) -> Option<GameUpdate> {
    if game.status != GameStatus::Pending {
        return None;
    }
    if game.creator_id.is_empty() || caller_id != game.creator_id {
        return None;
    }
    let target_id = game
        .players
        .iter()
        .find(|(_, name)| name.as_str() == target_name)
        .map(|(id, _)| id.clone())?;

    let mut update = GameUpdate::default();

    if game.team_red_spy == target_name {
        update.team_red_spy = Some(String::new());
    }
    if game.team_blue_spy == target_name {
        update.team_blue_spy = Some(String::new());
    }
    if game.team_red_guesser == target_name {
        update.team_red_guesser = Some(String::new());
    }
    if game.team_blue_guesser == target_name {
        update.team_blue_guesser = Some(String::new());
    }

    match role {
        RoleChoice::RedSpy => update.team_red_spy = Some(target_name.to_string()),
        RoleChoice::RedGuesser => update.team_red_guesser = Some(target_name.to_string()),
        RoleChoice::BlueSpy => update.team_blue_spy = Some(target_name.to_string()),
        RoleChoice::BlueGuesser => update.team_blue_guesser = Some(target_name.to_string()),
        RoleChoice::RedObserver | RoleChoice::BlueObserver => {}
    }

    let mut team_red = game.team_red.clone();
    let mut team_blue = game.team_blue.clone();
    team_red.remove(&target_id);
    team_blue.remove(&target_id);
    match role.team() {
        Team::Red => {
            team_red.insert(target_id, target_name.to_string());
        }
        Team::Blue => {
            team_blue.insert(target_id, target_name.to_string());
        }
    }
    if team_red != game.team_red {
        update.team_red = Some(team_red);
    }
    if team_blue != game.team_blue {
        update.team_blue = Some(team_blue);
    }

    Some(update)
}

/// Resolve a guess by the acting team's guesser.
///
/// Black ends the game for the other team on the spot. A wrong color passes
/// the turn; a correct one keeps it and may complete the team's count
/// (8 red / 9 blue) for the win.
pub fn handle_guess(game: &Game, caller_id: &str, word: &str) -> Option<GameUpdate> {
    if !game.can_guess(caller_id) {
        return None;
    }
    let team = game.team_of(caller_id)?;
    let card = *game.cards.get(word)?;
    if card.guessed {
        return None;
    }

    let mut cards = game.cards.clone();
    cards.insert(
        word.to_string(),
        Card {
            guessed: true,
            ..card
        },
    );

    let mut status = game.status;
    let mut whose_turn = game.whose_turn;
    if card.belongs_to == CardColor::Black {
        whose_turn = Turn::Over;
        status = team.other().won();
    } else if card.belongs_to != team.color() {
        whose_turn = team.other().turn();
    } else {
        let mut red_guessed = 0;
        let mut blue_guessed = 0;
        for c in cards.values().filter(|c| c.guessed) {
            match c.belongs_to {
                CardColor::Red => red_guessed += 1,
                CardColor::Blue => blue_guessed += 1,
                _ => {}
            }
        }
        if blue_guessed == BLUE_CARDS {
            whose_turn = Turn::Over;
            status = GameStatus::BlueWon;
        }
        if red_guessed == RED_CARDS {
            whose_turn = Turn::Over;
            status = GameStatus::RedWon;
        }
    }

    Some(GameUpdate {
        cards: Some(cards),
        status: Some(status),
        whose_turn: Some(whose_turn),
        last_card_guessed: Some(word.to_string()),
        last_card_guessed_by: Some(game.name_of(caller_id)?.to_string()),
        last_card_guessed_correctly: Some(card.belongs_to == team.color()),
        ..GameUpdate::default()
    })
}

/// Hand the turn to the other team. Same authority as guessing.
pub fn end_turn(game: &Game, caller_id: &str) -> Option<GameUpdate> {
    if !game.can_end_turn(caller_id) {
        return None;
    }
    let team = game.team_of(caller_id)?;
    Some(GameUpdate {
        whose_turn: Some(team.other().turn()),
        ..GameUpdate::default()
    })
}

/// Add a participant to a pending game. The first joiner becomes the
/// creator. A returning playerID may change its display name while the
/// game is still pending.
pub fn add_player(
    game: &Game,
    player_id: &str,
    player_name: &str,
    player_limit: usize,
) -> Result<GameUpdate, AppError> {
    if game.players.contains_key(player_id) {
        if game.status == GameStatus::Pending {
            let mut players = game.players.clone();
            players.insert(player_id.to_string(), player_name.to_string());
            return Ok(GameUpdate {
                players: Some(players),
                ..GameUpdate::default()
            });
        }
        return Err(AppError::conflict(
            "PLAYER_ALREADY_ADDED",
            format!("player {player_id} already joined game {}", game.id),
        ));
    }
    if game.players.values().any(|name| name == player_name) {
        return Err(AppError::conflict(
            "NAME_ALREADY_TAKEN",
            format!("display name {player_name} is taken in game {}", game.id),
        ));
    }
    if game.players.len() >= player_limit {
        return Err(AppError::conflict(
            "GAME_IS_FULL",
            format!("game {} is at the player limit", game.id),
        ));
    }
    if game.status != GameStatus::Pending {
        return Err(AppError::conflict(
            "GAME_ALREADY_STARTED",
            format!("game {} is no longer pending", game.id),
        ));
    }

    let mut players = game.players.clone();
    players.insert(player_id.to_string(), player_name.to_string());
    let mut update = GameUpdate {
        players: Some(players),
        ..GameUpdate::default()
    };
    if game.players.is_empty() {
        update.creator_id = Some(player_id.to_string());
    }
    Ok(update)
}
