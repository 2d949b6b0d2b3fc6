//! Per-game connection registry and fan-out.
//!
//! All registry state lives inside the `GameHub` actor; its mailbox is the
//! only path to it, so registration, broadcast, and removal for a game are
//! totally ordered. `Register` runs as an `AtomicResponse` so the store
//! fetch cannot interleave with a broadcast or an unregister for the same
//! game.

use std::collections::HashMap;
use std::sync::Arc;

use actix::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::game::Game;
use crate::store::GameStore;
use crate::ws::watcher;

/// Pushed to sessions. `Rejected` carries a terminal error code; the
/// session reports it and closes.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub enum GamePush {
    Snapshot(Arc<Game>),
    Rejected(&'static str),
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Register {
    pub game_id: String,
    pub session_id: String,
    /// None for spectators; players must already appear in the roster.
    pub player_id: Option<String>,
    pub recipient: Recipient<GamePush>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Unregister {
    pub game_id: String,
    pub session_id: String,
}

/// A fresh snapshot from the game's store watcher.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Broadcast {
    pub game_id: String,
    pub game: Game,
}

/// Test probe: live connections for a game.
#[derive(Message)]
#[rtype(result = "usize")]
pub struct ConnectionCount {
    pub game_id: String,
}

struct GameEntry {
    snapshot: Arc<Game>,
    connections: HashMap<String, Recipient<GamePush>>,
    watcher: CancellationToken,
}

pub struct GameHub {
    store: Arc<dyn GameStore>,
    games: HashMap<String, GameEntry>,
}

impl GameHub {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            store,
            games: HashMap::new(),
        }
    }
}

impl Actor for GameHub {
    type Context = Context<Self>;

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        for entry in self.games.values() {
            entry.watcher.cancel();
        }
    }
}

impl Handler<Register> for GameHub {
    type Result = AtomicResponse<Self, ()>;

    fn handle(&mut self, msg: Register, _ctx: &mut Self::Context) -> Self::Result {
        let store = self.store.clone();
        let game_id = msg.game_id.clone();

        AtomicResponse::new(Box::pin(
            async move { store.get_game(&game_id).await }
                .into_actor(self)
                .map(move |res, actor, ctx| {
                    let game = match res {
                        Ok(game) => game,
                        Err(err) => {
                            debug!(
                                game_id = %msg.game_id,
                                session_id = %msg.session_id,
                                error = %err,
                                "registration for unknown game"
                            );
                            msg.recipient.do_send(GamePush::Rejected("GAME_NOT_FOUND"));
                            return;
                        }
                    };

                    if let Some(player_id) = &msg.player_id {
                        if !game.is_member(player_id) {
                            warn!(
                                game_id = %msg.game_id,
                                session_id = %msg.session_id,
                                "registration by non-member"
                            );
                            msg.recipient
                                .do_send(GamePush::Rejected("PLAYER_NOT_IN_GAME"));
                            return;
                        }
                    }

                    let snapshot = Arc::new(game);
                    let store = actor.store.clone();
                    let hub = ctx.address().recipient::<Broadcast>();
                    let entry = actor.games.entry(msg.game_id.clone()).or_insert_with(|| {
                        let token = CancellationToken::new();
                        watcher::spawn(store, msg.game_id.clone(), hub, token.clone());
                        info!(game_id = %msg.game_id, "game watcher started");
                        GameEntry {
                            snapshot,
                            connections: HashMap::new(),
                            watcher: token,
                        }
                    });
                    // A registration may race a broadcast; prefer the
                    // fetched snapshot only for a brand-new entry.
                    msg.recipient
                        .do_send(GamePush::Snapshot(entry.snapshot.clone()));
                    entry.connections.insert(msg.session_id, msg.recipient);
                }),
        ))
    }
}

impl Handler<Broadcast> for GameHub {
    type Result = ();

    fn handle(&mut self, msg: Broadcast, _ctx: &mut Self::Context) -> Self::Result {
        let Some(entry) = self.games.get_mut(&msg.game_id) else {
            return;
        };
        entry.snapshot = Arc::new(msg.game);

        // Non-blocking fan-out: a slow consumer is dropped from the
        // registry on the spot; the forced Rejected push closes it once
        // its mailbox drains. Siblings are never delayed.
        let mut stalled = Vec::new();
        for (session_id, recipient) in &entry.connections {
            if recipient
                .try_send(GamePush::Snapshot(entry.snapshot.clone()))
                .is_err()
            {
                stalled.push(session_id.clone());
            }
        }
        for session_id in stalled {
            warn!(
                game_id = %msg.game_id,
                session_id = %session_id,
                "dropping slow websocket consumer"
            );
            if let Some(recipient) = entry.connections.remove(&session_id) {
                recipient.do_send(GamePush::Rejected("SLOW_CONSUMER"));
            }
        }
    }
}

impl Handler<Unregister> for GameHub {
    type Result = ();

    fn handle(&mut self, msg: Unregister, _ctx: &mut Self::Context) -> Self::Result {
        let Some(entry) = self.games.get_mut(&msg.game_id) else {
            return;
        };
        entry.connections.remove(&msg.session_id);
        if entry.connections.is_empty() {
            entry.watcher.cancel();
            self.games.remove(&msg.game_id);
            info!(game_id = %msg.game_id, "last connection gone, watcher cancelled");
        }
    }
}

impl Handler<ConnectionCount> for GameHub {
    type Result = usize;

    fn handle(&mut self, msg: ConnectionCount, _ctx: &mut Self::Context) -> Self::Result {
        self.games
            .get(&msg.game_id)
            .map(|entry| entry.connections.len())
            .unwrap_or(0)
    }
}
