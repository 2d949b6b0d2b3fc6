//! Shared application state handed to every handler.

use std::sync::Arc;

use actix::Addr;

use crate::domain::words::WordList;
use crate::store::GameStore;
use crate::ws::hub::GameHub;

pub struct AppState {
    store: Arc<dyn GameStore>,
    hub: Addr<GameHub>,
    words: Arc<WordList>,
    player_limit: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn GameStore>,
        hub: Addr<GameHub>,
        words: Arc<WordList>,
        player_limit: usize,
    ) -> Self {
        Self {
            store,
            hub,
            words,
            player_limit,
        }
    }

    pub fn store(&self) -> Arc<dyn GameStore> {
        self.store.clone()
    }

    pub fn hub(&self) -> &Addr<GameHub> {
        &self.hub
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    pub fn player_limit(&self) -> usize {
        self.player_limit
    }
}
