//! In-memory store adapter for tests and single-node development runs.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::domain::game::Game;
use crate::domain::update::GameUpdate;
use crate::error::AppError;
use crate::store::{unix_now, GameStore, GameStream};

const CHANGE_BUFFER: usize = 64;

struct Entry {
    game: Game,
    changes: broadcast::Sender<Game>,
}

#[derive(Default)]
pub struct InMemoryGameStore {
    games: Mutex<HashMap<String, Entry>>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live subscriber count for a game's change stream.
    pub fn watcher_count(&self, game_id: &str) -> usize {
        self.games
            .lock()
            .get(game_id)
            .map(|entry| entry.changes.receiver_count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn create_game(&self, game: &Game) -> Result<(), AppError> {
        let mut games = self.games.lock();
        if games.contains_key(&game.id) {
            return Err(AppError::conflict(
                "GAME_ALREADY_EXISTS",
                format!("game {} already exists", game.id),
            ));
        }
        let mut stored = game.clone();
        stored.updated_at = unix_now();
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        games.insert(
            game.id.clone(),
            Entry {
                game: stored,
                changes,
            },
        );
        Ok(())
    }

    async fn get_game(&self, game_id: &str) -> Result<Game, AppError> {
        self.games
            .lock()
            .get(game_id)
            .map(|entry| entry.game.clone())
            .ok_or_else(|| {
                AppError::not_found("GAME_NOT_FOUND", format!("no game with id {game_id}"))
            })
    }

    async fn update_game(&self, game_id: &str, update: &GameUpdate) -> Result<Game, AppError> {
        let mut games = self.games.lock();
        let entry = games.get_mut(game_id).ok_or_else(|| {
            AppError::not_found("GAME_NOT_FOUND", format!("no game with id {game_id}"))
        })?;
        update.apply(&mut entry.game);
        entry.game.updated_at = unix_now();
        // No receivers is fine; the snapshot is still committed.
        let _ = entry.changes.send(entry.game.clone());
        Ok(entry.game.clone())
    }

    async fn watch_game(&self, game_id: &str) -> Result<GameStream, AppError> {
        let receiver = self
            .games
            .lock()
            .get(game_id)
            .map(|entry| entry.changes.subscribe())
            .ok_or_else(|| {
                AppError::not_found("GAME_NOT_FOUND", format!("no game with id {game_id}"))
            })?;
        // A lagged watcher skips to the newest snapshot rather than dying.
        let stream = BroadcastStream::new(receiver).filter_map(|item| item.ok());
        Ok(Box::pin(stream))
    }
}
