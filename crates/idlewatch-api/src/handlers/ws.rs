//! WebSocket upgrade handler.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use idlewatch_realtime::connection::ConnectionHandle;
use idlewatch_realtime::message::{InboundMessage, OutboundMessage};
use idlewatch_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Missed pings tolerated before a connection is considered dead.
const MISSED_PINGS: i64 = 3;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: String,
}

/// GET /ws?token={jwt}
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    // Authenticate before upgrade
    let claims = state.jwt.decode(&query.token)?;
    let ctx = RequestContext::new(claims.user_id(), claims.role);

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, ctx, socket)))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, ctx: RequestContext, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let connections = state.realtime.connections.clone();

    let (handle, mut outbound_rx) = connections.register(ctx.user_id, ctx.role);
    let conn_id = handle.id;

    let unread_count = match state.notifications.unread_count(&ctx).await {
        Ok(count) => count,
        Err(e) => {
            warn!(conn_id = %conn_id, error = %e, "Unread count unavailable at connect");
            0
        }
    };
    connections.send_to_connection(
        &handle,
        &OutboundMessage::Connected {
            connection_id: conn_id,
            unread_count,
        },
    );

    // Outbound frames and keepalive pings share the connection's channel.
    let ping_every = Duration::from_secs(connections.config().ping_interval_seconds.max(1));
    let pinger = Arc::clone(&handle);
    let ping_connections = Arc::clone(&connections);
    let outbound_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ping_every);
        ticker.tick().await;
        let stale_after = ping_every.as_millis() as i64 * MISSED_PINGS;
        loop {
            tokio::select! {
                frame = outbound_rx.recv() => {
                    let Some(frame) = frame else { break };
                    if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if pinger.millis_since_pong() > stale_after {
                        warn!(conn_id = %pinger.id, "No pong received; closing connection");
                        pinger.mark_closed();
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                    ping_connections.send_to_connection(&pinger, &OutboundMessage::ping());
                }
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if let Some(request) = connections.handle_inbound(&conn_id, text.as_str()) {
                    handle_request(&state, &ctx, &handle, request).await;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
        if !handle.is_alive() {
            break;
        }
    }

    // Cleanup
    outbound_task.abort();
    connections.unregister(&conn_id);

    info!(
        conn_id = %conn_id,
        user_id = %ctx.user_id,
        "WebSocket connection closed"
    );
}

/// Applies a client request. The resulting unread count reaches the client
/// as a delta pushed by the notification service.
async fn handle_request(
    state: &AppState,
    ctx: &RequestContext,
    handle: &ConnectionHandle,
    request: InboundMessage,
) {
    let result = match request {
        InboundMessage::MarkRead { notification_id } => {
            state.notifications.mark_read(ctx, notification_id).await
        }
        InboundMessage::MarkAllRead => state.notifications.mark_all_read(ctx).await,
        InboundMessage::Pong { .. } => return,
    };

    if let Err(e) = result {
        state.realtime.connections.send_to_connection(
            handle,
            &OutboundMessage::error(&e.kind.to_string(), e.message),
        );
    }
}
