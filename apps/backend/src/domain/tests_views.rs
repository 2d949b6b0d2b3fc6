use crate::domain::game::{CardColor, GameStatus, Turn};
use crate::domain::player_view::{base_view, spectator_view, view_for_player};
use crate::domain::test_helpers::{ready_game, running_game};

#[test]
fn base_view_blanks_unguessed_ownership() {
    let mut game = running_game();
    game.cards.get_mut("w00").unwrap().guessed = true;

    let view = base_view(&game);
    assert_eq!(view.cards["w00"].belongs_to, CardColor::Black);
    assert!(view
        .cards
        .iter()
        .filter(|(word, _)| word.as_str() != "w00")
        .all(|(_, c)| c.belongs_to == CardColor::Neutral && !c.guessed));
}

#[test]
fn base_view_hides_guessers_while_pending() {
    let pending = base_view(&ready_game());
    assert_eq!(pending.team_red_guesser, "");
    assert_eq!(pending.team_blue_guesser, "");
    // Spies are public from the start.
    assert_eq!(pending.team_red_spy, "Ann");
    assert_eq!(pending.team_blue_spy, "Cy");

    let running = base_view(&running_game());
    assert_eq!(running.team_red_guesser, "Bo");
    assert_eq!(running.team_blue_guesser, "Di");
}

#[test]
fn base_view_exposes_names_not_ids() {
    let view = base_view(&ready_game());
    assert_eq!(view.players, vec!["Ann", "Bo", "Cy", "Di"]);
    assert_eq!(view.team_red, vec!["Ann", "Bo"]);
    assert_eq!(view.team_blue, vec!["Cy", "Di"]);
    assert!(!view.players.iter().any(|p| p.starts_with('p')));
}

#[test]
fn spy_sees_full_board() {
    let game = running_game();
    let view = view_for_player(&game, "p1", 8);
    assert_eq!(view.you, "Ann");
    assert_eq!(view.base_game.cards["w00"].belongs_to, CardColor::Black);
    assert_eq!(view.base_game.cards["w01"].belongs_to, CardColor::Red);
    assert_eq!(view.base_game.cards["w09"].belongs_to, CardColor::Blue);
}

#[test]
fn guesser_sees_blanked_board() {
    let game = running_game();
    let view = view_for_player(&game, "p4", 8);
    assert_eq!(view.you, "Di");
    assert!(view
        .base_game
        .cards
        .values()
        .all(|c| c.belongs_to == CardColor::Neutral));
}

#[test]
fn your_turn_tracks_team_membership() {
    let game = running_game();
    assert!(view_for_player(&game, "p3", 8).your_turn);
    assert!(view_for_player(&game, "p4", 8).your_turn);
    assert!(!view_for_player(&game, "p1", 8).your_turn);
    assert!(!view_for_player(&game, "p2", 8).your_turn);
}

#[test]
fn only_creator_owns_game() {
    let game = ready_game();
    assert!(view_for_player(&game, "p1", 8).you_own_game);
    assert!(!view_for_player(&game, "p2", 8).you_own_game);
}

#[test]
fn game_can_start_respects_player_window() {
    let mut game = ready_game();
    assert!(view_for_player(&game, "p1", 8).game_can_start);
    assert!(view_for_player(&game, "p1", 4).game_can_start);

    game.players.remove("p4");
    assert!(!view_for_player(&game, "p1", 8).game_can_start);

    let mut crowded = ready_game();
    crowded
        .players
        .insert("p5".to_string(), "Eve".to_string());
    assert!(!view_for_player(&crowded, "p1", 4).game_can_start);
}

#[test]
fn spectator_view_has_empty_personal_fields() {
    let game = running_game();
    let view = spectator_view(&game);
    assert_eq!(view.you, "");
    assert!(!view.you_own_game);
    assert!(!view.your_turn);
    assert!(!view.game_can_start);
    assert_eq!(view.base_game, base_view(&game));
}

#[test]
fn wire_shape_is_pascal_case() {
    let game = running_game();
    let json = serde_json::to_value(view_for_player(&game, "p4", 8)).unwrap();

    assert!(json.get("You").is_some());
    assert!(json.get("YouOwnGame").is_some());
    assert!(json.get("YourTurn").is_some());
    assert!(json.get("GameCanStart").is_some());

    let base = json.get("BaseGame").unwrap();
    assert!(base.get("ID").is_some());
    assert!(base.get("WhoseTurn").is_some());
    assert!(base.get("TeamRedSpy").is_some());
    assert!(base.get("LastCardGuessedCorrectly").is_some());

    let card = base.get("Cards").unwrap().get("w00").unwrap();
    assert!(card.get("Index").is_some());
    assert!(card.get("BelongsTo").is_some());
    assert!(card.get("Guessed").is_some());
}

#[test]
fn status_and_turn_serialize_lowercase() {
    assert_eq!(
        serde_json::to_string(&GameStatus::RedWon).unwrap(),
        "\"redwon\""
    );
    assert_eq!(serde_json::to_string(&Turn::Blue).unwrap(), "\"blue\"");
    assert_eq!(serde_json::to_string(&Turn::NotStarted).unwrap(), "\"\"");
    assert_eq!(
        serde_json::to_string(&CardColor::Neutral).unwrap(),
        "\"\""
    );
}
