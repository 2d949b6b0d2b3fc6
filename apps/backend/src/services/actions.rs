//! Maps inbound player actions onto rules-engine transitions.

use crate::domain::game::Game;
use crate::domain::transitions;
use crate::domain::update::GameUpdate;
use crate::domain::words::WordList;
use crate::error::AppError;
use crate::ws::protocol::PlayerAction;

/// Evaluate an action against a snapshot. `Ok(None)` means the action is
/// not permitted in the current state; the caller drops it silently.
pub fn evaluate(
    game: &Game,
    player_id: &str,
    action: &PlayerAction,
    words: &WordList,
) -> Result<Option<GameUpdate>, AppError> {
    match action {
        PlayerAction::StartGame => {
            transitions::start_game(game, player_id, words, &mut rand::rng())
        }
        PlayerAction::Guess(word) => Ok(transitions::handle_guess(game, player_id, word)),
        PlayerAction::EndTurn => Ok(transitions::end_turn(game, player_id)),
        PlayerAction::UpdateTeam { player_name, role } => {
            Ok(transitions::update_teams(game, player_id, player_name, *role))
        }
    }
}
