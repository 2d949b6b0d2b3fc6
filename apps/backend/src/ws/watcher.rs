//! Per-game bridge from the store's change stream to the hub.

use std::sync::Arc;

use actix::Recipient;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::store::GameStore;
use crate::ws::hub::Broadcast;

/// Forward every snapshot from `watch_game` to the hub until cancelled.
/// Cancellation is idempotent and only tears down this stream; the hub
/// owns the token and cancels it when the last connection leaves.
pub fn spawn(
    store: Arc<dyn GameStore>,
    game_id: String,
    hub: Recipient<Broadcast>,
    token: CancellationToken,
) {
    tokio::spawn(async move {
        let mut stream = match store.watch_game(&game_id).await {
            Ok(stream) => stream,
            Err(err) => {
                warn!(game_id = %game_id, error = %err, "failed to open game watch");
                return;
            }
        };

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(game_id = %game_id, "game watcher cancelled");
                    return;
                }
                item = stream.next() => {
                    match item {
                        Some(game) => hub.do_send(Broadcast {
                            game_id: game_id.clone(),
                            game,
                        }),
                        None => {
                            warn!(game_id = %game_id, "game watch stream ended");
                            return;
                        }
                    }
                }
            }
        }
    });
}
