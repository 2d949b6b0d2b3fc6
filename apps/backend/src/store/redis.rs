//! Redis store adapter.
//!
//! One hash per game (`game:{id}`) with JSON-encoded values per persisted
//! field, so a multi-field HSET commits a whole `GameUpdate` atomically.
//! Every committed mutation is re-read and published as a full snapshot on
//! `game-changes:{id}`; `watch_game` runs a dedicated subscriber with
//! reconnect and capped backoff.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rand::random;
use redis::aio::{ConnectionManager, PubSub};
use redis::{AsyncCommands, Client};
use tokio::sync::{mpsc, Mutex};
use tokio::time::sleep;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::domain::game::Game;
use crate::domain::update::GameUpdate;
use crate::error::AppError;
use crate::store::{unix_now, GameStore, GameStream};

const WRITE_MAX_ATTEMPTS: u32 = 3;
const WRITE_INITIAL_RETRY_DELAY_MS: u64 = 50;
const WRITE_MAX_RETRY_DELAY_MS: u64 = 200;

// Subscriber reconnect backoff
const SUB_INITIAL_RETRY_DELAY_SECS: u64 = 1;
const SUB_MAX_RETRY_DELAY_SECS: u64 = 60;
const SUB_RETRY_DELAY_MULTIPLIER: f64 = 2.0;
const SUB_JITTER_PERCENT: f64 = 0.2;

const WATCH_BUFFER: usize = 64;

fn game_key(game_id: &str) -> String {
    format!("game:{game_id}")
}

fn game_channel(game_id: &str) -> String {
    format!("game-changes:{game_id}")
}

pub struct RedisGameStore {
    redis_url: String,
    conn: Mutex<ConnectionManager>,
}

impl RedisGameStore {
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url)
            .map_err(|err| AppError::config(format!("invalid REDIS_URL: {err}")))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|err| AppError::store(format!("redis connection manager: {err}")))?;
        Ok(Self {
            redis_url: redis_url.to_string(),
            conn: Mutex::new(conn),
        })
    }

    /// Re-read the hash and publish the snapshot to the game channel.
    async fn publish_snapshot(&self, game_id: &str) -> Result<Game, AppError> {
        let game = self.get_game(game_id).await?;
        let payload = serde_json::to_string(&game)?;
        let channel = game_channel(game_id);

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let res = {
                let mut conn = self.conn.lock().await;
                conn.publish::<_, _, ()>(&channel, &payload).await
            };
            match res {
                Ok(()) => return Ok(game),
                Err(err) if attempt < WRITE_MAX_ATTEMPTS && is_transient(&err) => {
                    let delay_ms = WRITE_INITIAL_RETRY_DELAY_MS
                        .saturating_mul(2_u64.pow(attempt - 1))
                        .min(WRITE_MAX_RETRY_DELAY_MS);
                    warn!(
                        error = %err,
                        attempt,
                        retry_delay_ms = delay_ms,
                        "redis publish failed, retrying"
                    );
                    sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[async_trait]
impl GameStore for RedisGameStore {
    async fn create_game(&self, game: &Game) -> Result<(), AppError> {
        let key = game_key(&game.id);
        let mut conn = self.conn.lock().await;

        // The id field doubles as the creation claim.
        let claimed: bool = conn
            .hset_nx(&key, "id", serde_json::to_string(&game.id)?)
            .await?;
        if !claimed {
            return Err(AppError::conflict(
                "GAME_ALREADY_EXISTS",
                format!("game {} already exists", game.id),
            ));
        }

        let mut stored = game.clone();
        stored.updated_at = unix_now();
        let fields = encode_game(&stored)?;
        conn.hset_multiple::<_, _, _, ()>(&key, &fields).await?;
        Ok(())
    }

    async fn get_game(&self, game_id: &str) -> Result<Game, AppError> {
        let raw: HashMap<String, String> = {
            let mut conn = self.conn.lock().await;
            conn.hgetall(game_key(game_id)).await?
        };
        if raw.is_empty() {
            return Err(AppError::not_found(
                "GAME_NOT_FOUND",
                format!("no game with id {game_id}"),
            ));
        }
        decode_game(raw)
    }

    async fn update_game(&self, game_id: &str, update: &GameUpdate) -> Result<Game, AppError> {
        let key = game_key(game_id);
        let mut fields = update.field_pairs()?;
        fields.push(("updatedAt", serde_json::to_string(&unix_now())?));

        {
            let mut conn = self.conn.lock().await;
            let exists: bool = conn.exists(&key).await?;
            if !exists {
                return Err(AppError::not_found(
                    "GAME_NOT_FOUND",
                    format!("no game with id {game_id}"),
                ));
            }
            // One HSET commits the whole update.
            conn.hset_multiple::<_, _, _, ()>(&key, &fields).await?;
        }

        self.publish_snapshot(game_id).await
    }

    async fn watch_game(&self, game_id: &str) -> Result<GameStream, AppError> {
        // Fail fast on unknown ids instead of watching an empty channel.
        self.get_game(game_id).await?;

        let (tx, rx) = mpsc::channel(WATCH_BUFFER);
        let redis_url = self.redis_url.clone();
        let channel = game_channel(game_id);
        tokio::spawn(async move {
            run_watch_with_retry(&redis_url, &channel, tx).await;
        });
        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

fn encode_game(game: &Game) -> Result<Vec<(String, String)>, AppError> {
    let serde_json::Value::Object(map) = serde_json::to_value(game)? else {
        return Err(AppError::internal("game did not encode as an object"));
    };
    map.into_iter()
        .map(|(field, value)| Ok((field, serde_json::to_string(&value)?)))
        .collect()
}

fn decode_game(raw: HashMap<String, String>) -> Result<Game, AppError> {
    let mut map = serde_json::Map::new();
    for (field, value) in raw {
        let value: serde_json::Value = serde_json::from_str(&value).map_err(|err| {
            AppError::store(format!("corrupt value in field {field}: {err}"))
        })?;
        map.insert(field, value);
    }
    Ok(serde_json::from_value(serde_json::Value::Object(map))?)
}

fn is_transient(err: &redis::RedisError) -> bool {
    err.is_io_error()
        || err.is_timeout()
        || err.is_connection_dropped()
        || err.is_connection_refusal()
}

fn retry_delay(attempt: u32) -> Duration {
    let base = SUB_INITIAL_RETRY_DELAY_SECS as f64
        * SUB_RETRY_DELAY_MULTIPLIER.powi(attempt as i32 - 1);
    let capped = base.min(SUB_MAX_RETRY_DELAY_SECS as f64);
    let jitter = (random::<f64>() * 2.0 - 1.0) * capped * SUB_JITTER_PERCENT;
    Duration::from_secs_f64((capped + jitter).max(0.1))
}

async fn run_watch_with_retry(redis_url: &str, channel: &str, tx: mpsc::Sender<Game>) {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match run_watch(redis_url, channel, &tx).await {
            Ok(()) => {
                debug!(channel, "game watch closed, watcher gone");
                return;
            }
            Err(err) => {
                if tx.is_closed() {
                    return;
                }
                let delay = retry_delay(attempt);
                warn!(
                    error = %err,
                    channel,
                    attempt,
                    retry_delay_secs = delay.as_secs_f64(),
                    "game watch subscription failed, retrying"
                );
                sleep(delay).await;
                if attempt >= 20 {
                    attempt = 10;
                }
            }
        }
    }
}

/// Runs one subscription until the connection drops (Err) or the watcher
/// hangs up (Ok).
async fn run_watch(
    redis_url: &str,
    channel: &str,
    tx: &mpsc::Sender<Game>,
) -> Result<(), AppError> {
    let client = Client::open(redis_url)
        .map_err(|err| AppError::config(format!("invalid REDIS_URL: {err}")))?;
    let conn_info = client.get_connection_info();

    let addr = match conn_info.addr().clone() {
        redis::ConnectionAddr::Tcp(host, port) => (host, port),
        _ => {
            return Err(AppError::config(
                "only TCP redis connections are supported for pubsub",
            ));
        }
    };

    let stream = tokio::net::TcpStream::connect(addr)
        .await
        .map_err(|err| AppError::store(format!("redis pubsub connect: {err}")))?;
    let mut pubsub = PubSub::new(conn_info.redis_settings(), stream)
        .await
        .map_err(|err| AppError::store(format!("redis pubsub init: {err}")))?;
    pubsub
        .subscribe(channel)
        .await
        .map_err(|err| AppError::store(format!("redis subscribe {channel}: {err}")))?;

    info!(channel, "game watch subscription established");

    let mut messages = pubsub.into_on_message();
    while let Some(msg) = messages.next().await {
        let Ok(payload) = msg.get_payload::<String>() else {
            continue;
        };
        let game: Game = match serde_json::from_str(&payload) {
            Ok(game) => game,
            Err(err) => {
                warn!(error = %err, channel, "dropping undecodable game snapshot");
                continue;
            }
        };
        if tx.send(game).await.is_err() {
            return Ok(());
        }
    }

    Err(AppError::store("redis pubsub stream ended unexpectedly"))
}
