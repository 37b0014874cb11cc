use hypersweeper_common::protocol::{
    CascadeReveal, ClientMessage, GameWon, Notice, ServerMessage,
};
use rocket::{
    State,
    futures::{SinkExt, StreamExt},
    get,
    http::CookieJar,
};
use rocket_ws::{Channel, Message, WebSocket, stream::DuplexStream};
use tracing::{debug, error, info, instrument, warn};

use super::{client_id, mine_hit_response, safe_reveal_response};
use crate::{error::GameError, logic::RevealOutcome, registry::Registry};

async fn send(stream: &mut DuplexStream, message: &ServerMessage) -> rocket_ws::result::Result<()> {
    match serde_json::to_string(message) {
        Ok(text) => stream.send(Message::Text(text)).await,
        Err(e) => {
            error!("Failed to serialize outgoing message: {}", e);
            Ok(())
        }
    }
}

fn error_message(message: impl Into<String>) -> ServerMessage {
    ServerMessage::Error(Notice {
        message: message.into(),
    })
}

async fn dispatch(
    registry: &Registry,
    client_id: &str,
    request: ClientMessage,
) -> Result<Vec<ServerMessage>, GameError> {
    match request {
        ClientMessage::Reveal(coord) => {
            debug!("Client {} revealing cell {}", client_id, coord);
            let outcome = registry.lock_session(client_id).await?.reveal(coord)?;

            let reveal = match outcome {
                RevealOutcome::MineHit {
                    coord,
                    reveals_used,
                } => {
                    return Ok(vec![ServerMessage::MineHit(mine_hit_response(
                        coord,
                        reveals_used,
                    ))]);
                }
                RevealOutcome::Safe(reveal) => safe_reveal_response(reveal),
            };

            let mut replies = Vec::new();
            if reveal.cascade_size > 0 {
                replies.push(ServerMessage::CascadeReveal(CascadeReveal {
                    auto_revealed: reveal.auto_revealed.clone(),
                    cascade_size: reveal.cascade_size,
                }));
            }
            if let Some(victory) = &reveal.victory {
                replies.push(ServerMessage::GameWon(GameWon {
                    message: victory.message.clone(),
                    total_safe_cells: victory.total_safe_cells,
                    total_reveals: reveal.total_reveals,
                    flag: victory.flag.clone(),
                }));
            }
            replies.insert(0, ServerMessage::CellRevealed(reveal));
            Ok(replies)
        }
        ClientMessage::Flag(coord) => {
            debug!("Client {} flagging cell {}", client_id, coord);
            let response = registry.lock_session(client_id).await?.toggle_flag(coord)?;
            Ok(vec![ServerMessage::CellFlagged(response)])
        }
        ClientMessage::Restart => {
            registry.replace(client_id, None)?;
            Ok(vec![ServerMessage::GameRestarted(Notice {
                message: "Game restarted successfully".to_string(),
            })])
        }
        ClientMessage::Stats => {
            let stats = registry.lock_session(client_id).await?.stats();
            Ok(vec![ServerMessage::Stats(stats)])
        }
    }
}

/// Runs one request from a streaming client against its session and
/// returns the events to send back, in order. Failures become a single
/// `error` event.
#[instrument(level = "trace", skip(registry))]
pub async fn handle_message(
    registry: &Registry,
    client_id: &str,
    request: ClientMessage,
) -> Vec<ServerMessage> {
    match dispatch(registry, client_id, request).await {
        Ok(replies) => replies,
        Err(e) => {
            if e.is_internal() {
                error!("Internal error for client {}: {}", client_id, e);
            } else {
                warn!("Rejected request from client {}: {}", client_id, e);
            }
            vec![error_message(e.to_string())]
        }
    }
}

#[get("/ws")]
pub fn websocket_handler(
    ws: WebSocket,
    registry: &State<Registry>,
    cookies: &CookieJar<'_>,
) -> Channel<'static> {
    let client_id = client_id(cookies);
    let registry = registry.inner().clone();

    ws.channel(move |mut stream| {
        Box::pin(async move {
            info!("WebSocket connected: {}", client_id);

            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        let replies = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(request) => handle_message(&registry, &client_id, request).await,
                            Err(e) => {
                                warn!(
                                    "Invalid message format from {}: {} - Error: {}",
                                    client_id, text, e
                                );
                                vec![error_message(format!("Invalid message: {e}"))]
                            }
                        };
                        for reply in &replies {
                            send(&mut stream, reply).await?;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        info!("WebSocket closed by {}", client_id);
                        break;
                    }
                    Ok(Message::Ping(_) | Message::Pong(_)) => {}
                    Ok(_) => {
                        debug!("Ignoring non-text message from {}", client_id);
                    }
                    Err(e) => {
                        error!("WebSocket error for {}: {}", client_id, e);
                        break;
                    }
                }
            }

            info!("WebSocket disconnected: {}", client_id);
            Ok(())
        })
    })
}
