//! HTTP surface: game lifecycle endpoints and the websocket upgrades.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::health;
use crate::services::games;
use crate::state::AppState;
use crate::ws::session;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health))
        .route("/game/create", web::post().to(create_game))
        .route("/game/join", web::post().to(join_game))
        .route("/ws", web::get().to(session::player_upgrade))
        .route("/ws/spectate", web::get().to(session::spectator_upgrade));
}

#[derive(Serialize)]
struct CreateGameResponse {
    #[serde(rename = "gameID")]
    game_id: String,
}

async fn create_game(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let game = games::create_game(app_state.store().as_ref()).await?;
    Ok(HttpResponse::Created().json(CreateGameResponse { game_id: game.id }))
}

#[derive(Deserialize)]
struct JoinRequest {
    #[serde(rename = "gameID")]
    game_id: String,
    /// Optional: a returning player presents its previous id.
    #[serde(rename = "playerID", default)]
    player_id: Option<String>,
    #[serde(rename = "displayName")]
    display_name: String,
}

#[derive(Serialize)]
struct JoinResponse {
    #[serde(rename = "gameID")]
    game_id: String,
    #[serde(rename = "playerID")]
    player_id: String,
}

async fn join_game(
    app_state: web::Data<AppState>,
    body: web::Json<JoinRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let (game, player_id) = games::join_game(
        app_state.store().as_ref(),
        &body.game_id,
        body.player_id,
        &body.display_name,
        app_state.player_limit(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(JoinResponse {
        game_id: game.id,
        player_id,
    }))
}
