use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::board::BOARD_SIZE;
use crate::domain::game::{GameStatus, Turn};
use crate::domain::test_helpers::{ready_game, running_game};
use crate::domain::transitions::{
    add_player, end_turn, handle_guess, start_game, update_teams, RoleChoice,
};
use crate::domain::words::WordList;

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(1)
}

#[test]
fn start_game_requires_creator() {
    let game = ready_game();
    let words = WordList::embedded().unwrap();
    let update = start_game(&game, "p2", &words, &mut rng()).unwrap();
    assert!(update.is_none());
}

#[test]
fn start_game_requires_filled_roles() {
    let mut game = ready_game();
    game.team_blue_guesser.clear();
    let words = WordList::embedded().unwrap();
    let update = start_game(&game, "p1", &words, &mut rng()).unwrap();
    assert!(update.is_none());
}

#[test]
fn start_game_requires_minimum_players() {
    let mut game = ready_game();
    game.players.remove("p4");
    let words = WordList::embedded().unwrap();
    let update = start_game(&game, "p1", &words, &mut rng()).unwrap();
    assert!(update.is_none());
}

#[test]
fn start_game_deals_board_and_hands_turn_to_blue() {
    let game = ready_game();
    let words = WordList::embedded().unwrap();
    let update = start_game(&game, "p1", &words, &mut rng())
        .unwrap()
        .expect("ready game should start");

    assert_eq!(update.status, Some(GameStatus::Running));
    assert_eq!(update.whose_turn, Some(Turn::Blue));
    assert_eq!(update.cards.as_ref().map(|c| c.len()), Some(BOARD_SIZE));
}

#[test]
fn start_game_is_ignored_once_running() {
    let game = running_game();
    let words = WordList::embedded().unwrap();
    let update = start_game(&game, "p1", &words, &mut rng()).unwrap();
    assert!(update.is_none());
}

#[test]
fn update_teams_moves_player_and_clears_old_role() {
    let game = ready_game();
    // Ann is red spy; reassign her to blue guesser.
    let update = update_teams(&game, "p1", "Ann", RoleChoice::BlueGuesser).expect("valid move");

    assert_eq!(update.team_red_spy.as_deref(), Some(""));
    assert_eq!(update.team_blue_guesser.as_deref(), Some("Ann"));
    let team_red = update.team_red.expect("red roster changed");
    let team_blue = update.team_blue.expect("blue roster changed");
    assert!(!team_red.contains_key("p1"));
    assert_eq!(team_blue.get("p1").map(String::as_str), Some("Ann"));
}

#[test]
fn update_teams_observer_joins_side_without_role() {
    let game = ready_game();
    let update = update_teams(&game, "p1", "Bo", RoleChoice::BlueObserver).expect("valid move");

    // Bo held red guesser; it must be vacated.
    assert_eq!(update.team_red_guesser.as_deref(), Some(""));
    assert!(update.team_blue_guesser.is_none());
    assert!(update.team_blue.expect("moved").contains_key("p2"));
}

#[test]
fn update_teams_same_side_leaves_rosters_untouched() {
    let game = ready_game();
    // Ann stays red, just swaps role.
    let update = update_teams(&game, "p1", "Ann", RoleChoice::RedGuesser).expect("valid move");
    assert!(update.team_red.is_none());
    assert!(update.team_blue.is_none());
    assert_eq!(update.team_red_guesser.as_deref(), Some("Ann"));
    assert_eq!(update.team_red_spy.as_deref(), Some(""));
}

#[test]
fn update_teams_rejects_non_creator_and_unknown_target() {
    let game = ready_game();
    assert!(update_teams(&game, "p2", "Ann", RoleChoice::RedSpy).is_none());
    assert!(update_teams(&game, "p1", "Zed", RoleChoice::RedSpy).is_none());
}

#[test]
fn update_teams_rejected_once_running() {
    let game = running_game();
    assert!(update_teams(&game, "p1", "Ann", RoleChoice::RedSpy).is_none());
}

#[test]
fn guess_correct_color_keeps_turn() {
    let game = running_game();
    // Di is the blue guesser; w09 is blue.
    let update = handle_guess(&game, "p4", "w09").expect("valid guess");

    assert_eq!(update.whose_turn, Some(Turn::Blue));
    assert_eq!(update.status, Some(GameStatus::Running));
    assert_eq!(update.last_card_guessed.as_deref(), Some("w09"));
    assert_eq!(update.last_card_guessed_by.as_deref(), Some("Di"));
    assert_eq!(update.last_card_guessed_correctly, Some(true));
    assert!(update.cards.unwrap()["w09"].guessed);
}

#[test]
fn guess_wrong_color_passes_turn() {
    let game = running_game();
    // w20 is neutral.
    let update = handle_guess(&game, "p4", "w20").expect("valid guess");
    assert_eq!(update.whose_turn, Some(Turn::Red));
    assert_eq!(update.status, Some(GameStatus::Running));
    assert_eq!(update.last_card_guessed_correctly, Some(false));
}

#[test]
fn guess_black_card_loses_immediately() {
    let game = running_game();
    let update = handle_guess(&game, "p4", "w00").expect("valid guess");
    assert_eq!(update.status, Some(GameStatus::RedWon));
    assert_eq!(update.whose_turn, Some(Turn::Over));
}

#[test]
fn guessing_last_team_card_wins() {
    let mut game = running_game();
    // All blue cards but w17 already guessed.
    for i in 9..17 {
        game.cards.get_mut(&format!("w{i:02}")).unwrap().guessed = true;
    }
    let update = handle_guess(&game, "p4", "w17").expect("valid guess");
    assert_eq!(update.status, Some(GameStatus::BlueWon));
    assert_eq!(update.whose_turn, Some(Turn::Over));
}

#[test]
fn guess_rejected_for_spy_wrong_team_and_off_turn() {
    let game = running_game();
    // Cy is the blue spy, Bo the red guesser, Ann the red spy.
    assert!(handle_guess(&game, "p3", "w09").is_none());
    assert!(handle_guess(&game, "p2", "w09").is_none());
    assert!(handle_guess(&game, "p1", "w09").is_none());
}

#[test]
fn guess_rejected_for_unknown_or_spent_word() {
    let mut game = running_game();
    assert!(handle_guess(&game, "p4", "zeppelin").is_none());
    game.cards.get_mut("w09").unwrap().guessed = true;
    assert!(handle_guess(&game, "p4", "w09").is_none());
}

#[test]
fn end_turn_flips_to_other_team() {
    let game = running_game();
    let update = end_turn(&game, "p4").expect("guesser may pass");
    assert_eq!(update.whose_turn, Some(Turn::Red));
}

#[test]
fn end_turn_rejected_for_non_acting_guesser() {
    let game = running_game();
    assert!(end_turn(&game, "p2").is_none());
    assert!(end_turn(&game, "p3").is_none());
}

#[test]
fn first_joiner_becomes_creator() {
    let game = crate::domain::game::Game::new("g9".to_string());
    let update = add_player(&game, "p1", "Ann", 8).unwrap();
    assert_eq!(update.creator_id.as_deref(), Some("p1"));
    assert_eq!(
        update.players.unwrap().get("p1").map(String::as_str),
        Some("Ann")
    );
}

#[test]
fn rejoining_pending_game_updates_name_only() {
    let game = ready_game();
    let update = add_player(&game, "p2", "Bobby", 8).unwrap();
    assert!(update.creator_id.is_none());
    let players = update.players.unwrap();
    assert_eq!(players.get("p2").map(String::as_str), Some("Bobby"));
    assert_eq!(players.len(), game.players.len());
}

#[test]
fn join_conflicts_carry_codes() {
    let mut game = ready_game();

    let err = add_player(&game, "p9", "Ann", 8).unwrap_err();
    assert!(err.to_string().contains("taken"));

    let err = add_player(&game, "p9", "Eve", 4).unwrap_err();
    assert!(err.to_string().contains("limit"));

    game.status = GameStatus::Running;
    let err = add_player(&game, "p9", "Eve", 8).unwrap_err();
    assert!(err.to_string().contains("no longer pending"));

    let err = add_player(&game, "p2", "Bo", 8).unwrap_err();
    assert!(err.to_string().contains("already joined"));
}
