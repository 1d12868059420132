//! Per-connection handler: event decoding, registry dispatch, outbound
//! delivery.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Derive the player's identity from the connection id
//!   2. Open an outbound channel; the registry keeps its sender in the
//!      player's roster entry
//!   3. Loop: decode inbound frames → apply to the registry, and write
//!      queued outbound events as text frames
//!   4. On exit, the guard removes the player from its room

use std::sync::Arc;
use std::sync::atomic::Ordering;

use ludo_protocol::{ClientEvent, Codec, PlayerId, ServerEvent};
use ludo_room::{PlayerSender, RoomError, RoomRegistry};
use ludo_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::RelayError;
use crate::server::ServerState;

/// Drop guard that removes a player from its room when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
struct ConnectionGuard {
    player_id: PlayerId,
    state: Arc<ServerState>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.state.connections.fetch_sub(1, Ordering::Relaxed);

        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut rooms = state.rooms.lock().await;
            if let Some(departure) = rooms.disconnect(player_id) {
                tracing::info!(
                    room_id = %departure.room_id,
                    %player_id,
                    room_closed = departure.room_closed,
                    "disconnected player removed from room"
                );
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), RelayError> {
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());

    state.connections.fetch_add(1, Ordering::Relaxed);
    let _guard = ConnectionGuard {
        player_id,
        state: Arc::clone(&state),
    };
    tracing::debug!(%conn_id, %player_id, "handling new connection");

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    loop {
        tokio::select! {
            inbound = conn.recv() => {
                let data = match inbound {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%player_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        break;
                    }
                };

                let event: ClientEvent = match state.codec.decode(&data) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "ignoring undecodable frame");
                        continue;
                    }
                };

                let mut rooms = state.rooms.lock().await;
                dispatch(&mut rooms, player_id, &tx, event);
            }

            // `tx` lives as long as this loop, so `recv` never yields None.
            Some(event) = rx.recv() => {
                let text = state.codec.encode(&event)?;
                conn.send_text(&text).await?;
            }
        }
    }

    // _guard drops here → disconnect fires.
    Ok(())
}

/// Applies one client event to the registry.
///
/// Runs entirely under the registry lock. Replies for the sender go into
/// its own outbound channel, the same one broadcasts use, so the sender
/// sees events in the order the registry produced them.
pub(crate) fn dispatch(
    rooms: &mut RoomRegistry,
    player_id: PlayerId,
    tx: &PlayerSender,
    event: ClientEvent,
) {
    let name = event.name();

    let outcome: Result<(), RoomError> = match event {
        ClientEvent::CreateRoom { player_name } => rooms
            .create(player_id, &player_name, tx.clone())
            .map(|joined| {
                let _ = tx.send(ServerEvent::RoomCreated {
                    room_id: joined.room_id,
                    player_id: joined.player_id,
                    players: joined.players,
                });
            }),
        ClientEvent::JoinRoom {
            room_id,
            player_name,
        } => rooms
            .join(&room_id, player_id, &player_name, tx.clone())
            .map(|joined| {
                let _ = tx.send(ServerEvent::RoomJoined {
                    room_id: joined.room_id,
                    player_id: joined.player_id,
                    players: joined.players,
                });
            }),
        ClientEvent::StartGame { room_id, .. } => {
            rooms.start_game(&room_id, player_id)
        }
        ClientEvent::RollDice { room_id, .. } => {
            rooms.roll_dice(&room_id, player_id).map(|_| ())
        }
        ClientEvent::MovePiece {
            room_id, piece_id, ..
        } => rooms.move_piece(&room_id, player_id, piece_id),
        ClientEvent::LeaveRoom { room_id, .. } => {
            rooms.leave(&room_id, player_id);
            Ok(())
        }
    };

    if let Err(e) = outcome {
        tracing::debug!(
            %player_id,
            event = name,
            error = %e,
            "request rejected"
        );
        let _ = tx.send(ServerEvent::Error {
            message: e.to_string(),
        });
    }
}
