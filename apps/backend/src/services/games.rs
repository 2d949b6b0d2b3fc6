//! Game lifecycle services backing the HTTP endpoints.

use tracing::info;
use uuid::Uuid;

use crate::domain::game::Game;
use crate::error::AppError;
use crate::store::GameStore;
use crate::utils::make_easy_id;

pub const GAME_ID_LENGTH: usize = 4;
const CREATE_MAX_ATTEMPTS: usize = 8;

/// Create a game under a fresh short id, retrying on id collisions.
pub async fn create_game(store: &dyn GameStore) -> Result<Game, AppError> {
    for _ in 0..CREATE_MAX_ATTEMPTS {
        let game = Game::new(make_easy_id(GAME_ID_LENGTH));
        match store.create_game(&game).await {
            Ok(()) => {
                info!(game_id = %game.id, "game created");
                return Ok(game);
            }
            Err(AppError::Conflict { .. }) => continue,
            Err(err) => return Err(err),
        }
    }
    Err(AppError::internal(
        "could not allocate an unused game id, id space exhausted?",
    ))
}

/// Join a pending game. The caller may bring its own opaque playerID (to
/// reclaim a seat); otherwise one is generated.
pub async fn join_game(
    store: &dyn GameStore,
    game_id: &str,
    player_id: Option<String>,
    player_name: &str,
    player_limit: usize,
) -> Result<(Game, String), AppError> {
    let player_name = player_name.trim();
    if player_name.is_empty() {
        return Err(AppError::invalid(
            "MISSING_NAME",
            "displayName is required to join",
        ));
    }
    let player_id = match player_id.filter(|id| !id.is_empty()) {
        Some(id) => id,
        None => Uuid::new_v4().to_string(),
    };

    let game = store
        .join_game(game_id, &player_id, player_name, player_limit)
        .await?;
    info!(game_id = %game_id, player_id = %player_id, "player joined");
    Ok((game, player_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryGameStore;

    #[tokio::test]
    async fn create_allocates_short_uppercase_ids() {
        let store = InMemoryGameStore::new();
        let game = create_game(&store).await.unwrap();
        assert_eq!(game.id.len(), GAME_ID_LENGTH);
        assert!(game.id.chars().all(|c| c.is_ascii_uppercase()));
        assert!(store.get_game(&game.id).await.is_ok());
    }

    #[tokio::test]
    async fn join_generates_player_id_when_absent() {
        let store = InMemoryGameStore::new();
        let game = create_game(&store).await.unwrap();

        let (joined, player_id) = join_game(&store, &game.id, None, "Ann", 8).await.unwrap();
        assert!(!player_id.is_empty());
        assert_eq!(joined.creator_id, player_id);
        assert_eq!(joined.players.get(&player_id).map(String::as_str), Some("Ann"));
    }

    #[tokio::test]
    async fn join_requires_a_name() {
        let store = InMemoryGameStore::new();
        let game = create_game(&store).await.unwrap();
        let err = join_game(&store, &game.id, None, "  ", 8).await.unwrap_err();
        assert!(err.to_string().contains("displayName"));
    }

    #[tokio::test]
    async fn join_unknown_game_is_not_found() {
        let store = InMemoryGameStore::new();
        assert!(join_game(&store, "ZZZZ", None, "Ann", 8).await.is_err());
    }
}
