//! WebSocket handler.
//!
//! Responsibilities:
//! - Refuse upgrades from origins outside the allowlist
//! - Register the socket with the connection hub (outbound queue)
//! - Lifecycle: ping/pong + idle timeout
//! - Decode-once then dispatch to the relay, answering bad frames with ERROR
//! - On exit, report the closed connection to the disconnect listener

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::{debug, info_span, warn, Instrument};

use codecollab_core::error::CodeCollabError;
use codecollab_core::protocol::ServerMessage;

use crate::app_state::AppState;
use crate::context::ConnectionContext;
use crate::transport::codec::{self, decode, Inbound};
use crate::transport::{ConnId, ConnectionHub};

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(
    State(app): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    if !app.origin_guard().allows(&headers) {
        warn!(origin = ?headers.get(axum::http::header::ORIGIN), "upgrade refused: origin not allowed");
        return StatusCode::FORBIDDEN.into_response();
    }

    ws.on_upgrade(move |socket| run_session(app, socket))
}

// --------------------
// Session lifecycle
// --------------------
async fn run_session(app: AppState, socket: WebSocket) {
    let gw = &app.cfg().gateway;
    let (out_tx, out_rx) = mpsc::channel::<Message>(gw.outbound_queue);

    let hub = app.hub();
    let conn_id = hub.register(out_tx);
    let mut ctx = ConnectionContext::new(conn_id);

    let span = info_span!("conn", conn = conn_id);
    async {
        debug!("connected");
        session_loop(&app, &mut ctx, socket, out_rx).await;

        let closed = ctx.closed_event();
        let session_id = closed.session_id.clone();
        app.disconnect_handler().on_connection_closed(closed);
        hub.remove_connection(conn_id, session_id.as_deref());
        debug!("disconnected");
    }
    .instrument(span)
    .await;
}

fn reply_error(hub: &ConnectionHub, conn: ConnId, err: &CodeCollabError) {
    match codec::encode(&ServerMessage::error(err)) {
        Ok(m) => hub.deliver(conn, m),
        Err(e) => warn!(error = %e, "error reply encode failed"),
    }
}

// --------------------
// Core session loop
// --------------------
async fn session_loop(
    app: &AppState,
    ctx: &mut ConnectionContext,
    socket: WebSocket,
    mut out_rx: mpsc::Receiver<Message>,
) {
    let gw = &app.cfg().gateway;
    let ping_every = Duration::from_millis(gw.ping_interval_ms);
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);
    let max_frame_bytes = gw.max_frame_bytes;
    let dispatcher = app.dispatcher();
    let hub = app.hub();
    let conn_id = ctx.conn_id();

    let (mut ws_tx, mut ws_rx) = socket.split();

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(m) => {
                        if ws_tx.send(m).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let msg = match incoming {
                    Ok(msg) => msg,
                    Err(e) => {
                        debug!(error = %e, "socket read failed");
                        break;
                    }
                };
                last_activity = Instant::now();

                match decode(msg, max_frame_bytes) {
                    Ok(Inbound::Frame(frame)) => {
                        if let Err(e) = dispatcher.dispatch(ctx, frame) {
                            debug!(error = %e, "frame rejected");
                            reply_error(&hub, conn_id, &e);
                        }
                    }
                    Ok(Inbound::Ping(payload)) => {
                        hub.deliver(conn_id, Message::Pong(payload));
                    }
                    Ok(Inbound::Pong(_)) => {}
                    Ok(Inbound::Close) => break,
                    Err(e) => {
                        warn!(error = %e, "bad frame");
                        reply_error(&hub, conn_id, &e);
                    }
                }
            }

            // ping
            _ = ping_tick.tick() => {
                hub.deliver(conn_id, Message::Ping(Vec::new()));
            }

            // idle timeout
            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if last_activity.elapsed() >= idle_timeout {
                    let err = CodeCollabError::Timeout;
                    if let Ok(m) = codec::encode(&ServerMessage::error(&err)) {
                        let _ = ws_tx.send(m).await;
                    }
                    break;
                }
            }
        }
    }
}
