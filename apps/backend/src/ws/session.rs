//! Websocket session actor, one per connection.
//!
//! Sessions never touch hub state directly: they register with the hub,
//! receive `GamePush` messages through their own mailbox, and project each
//! snapshot for their own role before writing it out. Inbound player
//! actions are evaluated against the last pushed snapshot; rejected actions
//! are logged and dropped without a reply.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::game::Game;
use crate::domain::player_view;
use crate::services::actions;
use crate::state::AppState;
use crate::ws::hub::{GamePush, Register, Unregister};
use crate::ws::protocol::{ErrorFrame, IncomingMessage, PlayerAction};

/// Read deadline: a connection that hasn't answered a ping in this long is
/// gone. Pings go out at 9/10 of the deadline.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(60);
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(54);
const MAX_MESSAGE_BYTES: usize = 512;

#[derive(Debug, Deserialize)]
pub struct PlayerQuery {
    #[serde(rename = "gameID")]
    game_id: Option<String>,
    #[serde(rename = "playerID")]
    player_id: Option<String>,
    #[serde(rename = "sessionID")]
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpectatorQuery {
    #[serde(rename = "gameID")]
    game_id: Option<String>,
}

/// `GET /ws?gameID=&playerID=&sessionID=` — player connection. Missing
/// identifiers still complete the upgrade so the client gets a structured
/// error frame before the close.
pub async fn player_upgrade(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<PlayerQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let query = query.into_inner();
    let session = match (query.game_id, query.player_id, query.session_id) {
        (Some(game_id), Some(player_id), Some(session_id))
            if !game_id.is_empty() && !player_id.is_empty() && !session_id.is_empty() =>
        {
            WsSession::player(game_id, player_id, session_id, app_state)
        }
        _ => WsSession::rejected("MISSING_IDENTIFIERS", app_state),
    };
    ws::start(session, &req, stream)
}

/// `GET /ws/spectate?gameID=` — read-only connection with a
/// server-generated session id.
pub async fn spectator_upgrade(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<SpectatorQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = match query.into_inner().game_id {
        Some(game_id) if !game_id.is_empty() => WsSession::spectator(game_id, app_state),
        _ => WsSession::rejected("MISSING_IDENTIFIERS", app_state),
    };
    ws::start(session, &req, stream)
}

pub struct WsSession {
    game_id: String,
    session_id: String,
    /// None for spectators.
    player_id: Option<String>,
    app_state: web::Data<AppState>,
    /// Set when the upgrade itself was invalid; reported then closed
    /// before any registration happens.
    rejection: Option<&'static str>,
    /// Last snapshot pushed by the hub; actions are evaluated against it.
    snapshot: Option<Arc<Game>>,
    last_heartbeat: Instant,
}

impl WsSession {
    fn player(
        game_id: String,
        player_id: String,
        session_id: String,
        app_state: web::Data<AppState>,
    ) -> Self {
        Self {
            game_id,
            session_id,
            player_id: Some(player_id),
            app_state,
            rejection: None,
            snapshot: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn spectator(game_id: String, app_state: web::Data<AppState>) -> Self {
        Self {
            game_id,
            session_id: Uuid::new_v4().to_string(),
            player_id: None,
            app_state,
            rejection: None,
            snapshot: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn rejected(code: &'static str, app_state: web::Data<AppState>) -> Self {
        Self {
            game_id: String::new(),
            session_id: Uuid::new_v4().to_string(),
            player_id: None,
            app_state,
            rejection: Some(code),
            snapshot: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_error_and_close(&self, ctx: &mut ws::WebsocketContext<Self>, code: &str) {
        match serde_json::to_string(&ErrorFrame { error: code }) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "failed to serialize error frame"),
        }
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    game_id = %actor.game_id,
                    session_id = %actor.session_id,
                    "websocket heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn push_snapshot(&self, ctx: &mut ws::WebsocketContext<Self>, game: &Game) {
        let limit = self.app_state.player_limit();
        let encoded = match &self.player_id {
            Some(player_id) => {
                serde_json::to_string(&player_view::view_for_player(game, player_id, limit))
            }
            None => serde_json::to_string(&player_view::spectator_view(game)),
        };
        match encoded {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(
                game_id = %self.game_id,
                error = %err,
                "failed to serialize snapshot view"
            ),
        }
    }

    fn dispatch(&self, action: PlayerAction, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(player_id) = &self.player_id else {
            debug!(
                game_id = %self.game_id,
                session_id = %self.session_id,
                "spectator action dropped"
            );
            return;
        };
        let Some(snapshot) = &self.snapshot else {
            debug!(game_id = %self.game_id, "action before first snapshot dropped");
            return;
        };

        let update =
            match actions::evaluate(snapshot, player_id, &action, self.app_state.words()) {
                Ok(Some(update)) if !update.is_empty() => update,
                Ok(_) => {
                    debug!(
                        game_id = %self.game_id,
                        player_id = %player_id,
                        ?action,
                        "action not permitted in current state, dropped"
                    );
                    return;
                }
                Err(err) => {
                    debug!(
                        game_id = %self.game_id,
                        player_id = %player_id,
                        error = %err,
                        "action evaluation failed, dropped"
                    );
                    return;
                }
            };

        let store = self.app_state.store();
        let game_id = self.game_id.clone();
        ctx.spawn(
            async move { store.update_game(&game_id, &update).await }
                .into_actor(self)
                .map(|res, actor, _ctx| {
                    if let Err(err) = res {
                        debug!(
                            game_id = %actor.game_id,
                            error = %err,
                            "failed to persist action, dropped"
                        );
                    }
                }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        if let Some(code) = self.rejection {
            self.send_error_and_close(ctx, code);
            return;
        }

        info!(
            game_id = %self.game_id,
            session_id = %self.session_id,
            spectator = self.player_id.is_none(),
            "websocket session started"
        );

        self.app_state.hub().do_send(Register {
            game_id: self.game_id.clone(),
            session_id: self.session_id.clone(),
            player_id: self.player_id.clone(),
            recipient: ctx.address().recipient(),
        });
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if self.rejection.is_some() {
            return;
        }
        self.app_state.hub().do_send(Unregister {
            game_id: self.game_id.clone(),
            session_id: self.session_id.clone(),
        });
        info!(
            game_id = %self.game_id,
            session_id = %self.session_id,
            "websocket session stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                if text.len() > MAX_MESSAGE_BYTES {
                    self.send_error_and_close(ctx, "MESSAGE_TOO_LARGE");
                    return;
                }
                let Ok(incoming) = serde_json::from_str::<IncomingMessage>(&text) else {
                    self.send_error_and_close(ctx, "MALFORMED_MESSAGE");
                    return;
                };
                let Some(action) = PlayerAction::parse(&incoming.action) else {
                    debug!(
                        game_id = %self.game_id,
                        action = %incoming.action,
                        "unknown action ignored"
                    );
                    return;
                };
                self.dispatch(action, ctx);
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, "BINARY_NOT_SUPPORTED");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    game_id = %self.game_id,
                    session_id = %self.session_id,
                    error = %err,
                    "websocket protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<GamePush> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: GamePush, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            GamePush::Snapshot(game) => {
                self.push_snapshot(ctx, &game);
                self.snapshot = Some(game);
            }
            GamePush::Rejected(code) => {
                self.send_error_and_close(ctx, code);
            }
        }
    }
}
