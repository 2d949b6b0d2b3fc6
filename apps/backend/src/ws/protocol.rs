//! Websocket wire protocol.
//!
//! Inbound frames are JSON objects with a single `Action` string holding a
//! verb and its space-separated arguments. Outbound frames are projected
//! snapshots or an error object; ping/pong never carries payloads.

use serde::{Deserialize, Serialize};

use crate::domain::transitions::RoleChoice;

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    #[serde(rename = "Action")]
    pub action: String,
}

/// Error frame pushed before closing a rejected or broken connection.
#[derive(Debug, Serialize)]
pub struct ErrorFrame<'a> {
    #[serde(rename = "Error")]
    pub error: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    StartGame,
    Guess(String),
    EndTurn,
    UpdateTeam { player_name: String, role: RoleChoice },
}

impl PlayerAction {
    /// Parse an `Action` string. Unknown verbs and malformed argument lists
    /// yield `None` and are ignored by the session.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (verb, rest) = match raw.split_once(' ') {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (raw, ""),
        };
        match verb {
            "StartGame" if rest.is_empty() => Some(PlayerAction::StartGame),
            "EndTurn" if rest.is_empty() => Some(PlayerAction::EndTurn),
            "Guess" if !rest.is_empty() && !rest.contains(' ') => {
                Some(PlayerAction::Guess(rest.to_string()))
            }
            // Display names may contain spaces; the role is the last token.
            "UpdateTeam" => {
                let (name, role) = rest.rsplit_once(' ')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some(PlayerAction::UpdateTeam {
                    player_name: name.to_string(),
                    role: RoleChoice::parse(role)?,
                })
            }
            _ => None,
        }
    }
}
