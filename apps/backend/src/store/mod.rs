//! Persistence contract for game documents.
//!
//! The server consumes this surface and nothing else: claim an id, read a
//! snapshot, apply a partial update atomically, and watch a game's change
//! stream. Every successful mutation surfaces on the stream as a full
//! snapshot; watchers never see partial writes.

pub mod memory;
pub mod redis;

use std::pin::Pin;

use async_trait::async_trait;
use tokio_stream::Stream;

use crate::domain::game::Game;
use crate::domain::transitions;
use crate::domain::update::GameUpdate;
use crate::error::AppError;

/// Full snapshots, one per committed mutation, in commit order.
pub type GameStream = Pin<Box<dyn Stream<Item = Game> + Send>>;

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Persist a new game, failing if the id is already claimed.
    async fn create_game(&self, game: &Game) -> Result<(), AppError>;

    /// Read the current snapshot.
    async fn get_game(&self, game_id: &str) -> Result<Game, AppError>;

    /// Apply every present field of `update` in one atomic write, stamp
    /// `updatedAt`, and return the resulting snapshot.
    async fn update_game(&self, game_id: &str, update: &GameUpdate) -> Result<Game, AppError>;

    /// Subscribe to the game's change stream. The stream yields a snapshot
    /// for every mutation committed after the subscription is established.
    async fn watch_game(&self, game_id: &str) -> Result<GameStream, AppError>;

    /// Read-modify-write join. Conflict errors carry the join taxonomy
    /// codes so HTTP callers can surface them verbatim.
    async fn join_game(
        &self,
        game_id: &str,
        player_id: &str,
        player_name: &str,
        player_limit: usize,
    ) -> Result<Game, AppError> {
        let game = self.get_game(game_id).await?;
        let update = transitions::add_player(&game, player_id, player_name, player_limit)?;
        self.update_game(game_id, &update).await
    }
}

pub(crate) fn unix_now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
