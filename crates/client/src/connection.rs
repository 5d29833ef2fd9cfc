//! Live board socket.
//!
//! [`BoardConnection`] joins one board room and yields the events broadcast
//! to it. [`open_board`] pairs a connection with a freshly seeded
//! [`BoardMirror`].

use futures::{SinkExt, StreamExt};
use taskboard_core::board::PresenceUser;
use taskboard_core::protocol::{BoardEvent, ClientMessage, ServerFrame};
use taskboard_core::types::DbId;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::api::BoardApi;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::mirror::BoardMirror;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A socket subscribed to one board room.
pub struct BoardConnection {
    board_id: DbId,
    ws_stream: WsStream,
}

impl BoardConnection {
    /// Open the socket and join `board_id`'s room, announcing presence as
    /// `user`.
    pub async fn connect(
        config: &ClientConfig,
        board_id: DbId,
        user: PresenceUser,
    ) -> Result<Self, ClientError> {
        let url = format!("{}?token={}", config.ws_url, config.token);
        let (mut ws_stream, _response) = connect_async(url.as_str()).await?;

        let join = ClientMessage::JoinBoard { board_id, user }.to_json()?;
        ws_stream.send(Message::Text(join)).await?;

        tracing::info!(board_id, "Joined board room at {}", config.ws_url);
        Ok(Self {
            board_id,
            ws_stream,
        })
    }

    pub fn board_id(&self) -> DbId {
        self.board_id
    }

    /// Wait for the next board event.
    ///
    /// Error notices and unparseable frames are logged and skipped.
    /// Returns `None` once the server closes the socket.
    pub async fn next_event(&mut self) -> Result<Option<BoardEvent>, ClientError> {
        while let Some(msg) = self.ws_stream.next().await {
            match msg? {
                Message::Text(text) => match ServerFrame::parse(&text) {
                    Ok(ServerFrame::Event(event)) => return Ok(Some(event)),
                    Ok(ServerFrame::Error(notice)) => {
                        tracing::warn!(
                            board_id = self.board_id,
                            message = notice.message(),
                            "Server rejected a frame"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            board_id = self.board_id,
                            error = %e,
                            raw_message = %text,
                            "Failed to parse server frame"
                        );
                    }
                },
                Message::Close(frame) => {
                    tracing::info!(board_id = self.board_id, ?frame, "Board socket closed");
                    return Ok(None);
                }
                // Ping/pong is handled by tungstenite.
                _ => {}
            }
        }
        Ok(None)
    }

    /// Apply every incoming event to `mirror` until the socket closes.
    pub async fn sync(&mut self, mirror: &mut BoardMirror) -> Result<(), ClientError> {
        while let Some(event) = self.next_event().await? {
            tracing::trace!(board_id = self.board_id, event = event.name(), "Applying event");
            mirror.apply(self.board_id, event);
        }
        Ok(())
    }

    /// Leave the room and close the socket.
    pub async fn leave(mut self) -> Result<(), ClientError> {
        let leave = ClientMessage::LeaveBoard {
            board_id: self.board_id,
        }
        .to_json()?;
        self.ws_stream.send(Message::Text(leave)).await?;
        self.ws_stream.close(None).await?;
        tracing::info!(board_id = self.board_id, "Left board room");
        Ok(())
    }
}

/// Join a board's room and seed a mirror from its snapshot.
///
/// The room is joined before the snapshot is fetched so that no change made
/// in between is missed; events that overlap the snapshot merge idempotently.
pub async fn open_board(
    api: &BoardApi,
    config: &ClientConfig,
    board_id: DbId,
    user: PresenceUser,
) -> Result<(BoardMirror, BoardConnection), ClientError> {
    let connection = BoardConnection::connect(config, board_id, user).await?;
    let snapshot = api.get_board(board_id).await?;
    Ok((BoardMirror::from_snapshot(snapshot), connection))
}
