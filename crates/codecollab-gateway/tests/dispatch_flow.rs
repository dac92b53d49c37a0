//! Connection-level flow: dispatcher + connection hub + relay, minus sockets.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::extract::ws::Message;
use serde_json::Value;
use tokio::sync::mpsc;

use codecollab_core::protocol::decode_client_frame;
use codecollab_gateway::app_state::AppState;
use codecollab_gateway::config::GatewayConfig;
use codecollab_gateway::context::{ConnectionContext, Phase};

struct Client {
    ctx: ConnectionContext,
    rx: mpsc::Receiver<Message>,
}

impl Client {
    fn connect(app: &AppState) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let conn_id = app.hub().register(tx);
        Self {
            ctx: ConnectionContext::new(conn_id),
            rx,
        }
    }

    fn send(&mut self, app: &AppState, frame: &str) -> Result<(), String> {
        let frame = decode_client_frame(frame).map_err(|e| e.to_string())?;
        app.dispatcher()
            .dispatch(&mut self.ctx, frame)
            .map_err(|e| e.client_code().as_str().to_string())
    }

    fn recv_all(&mut self) -> Vec<Value> {
        let mut out = Vec::new();
        while let Ok(m) = self.rx.try_recv() {
            match m {
                Message::Text(s) => out.push(serde_json::from_str(&s).unwrap()),
                other => panic!("unexpected frame {other:?}"),
            }
        }
        out
    }

    fn session_id(&self) -> String {
        match self.ctx.phase() {
            Phase::Joined { session_id, .. } => session_id.clone(),
            other => panic!("not joined: {other:?}"),
        }
    }

    fn close(self, app: &AppState) {
        let closed = self.ctx.closed_event();
        let sid = closed.session_id.clone();
        app.disconnect_handler().on_connection_closed(closed);
        app.hub().remove_connection(self.ctx.conn_id(), sid.as_deref());
    }
}

fn app() -> AppState {
    AppState::new(GatewayConfig::default())
}

#[test]
fn joiners_receive_rosters_and_edits() {
    let app = app();
    let mut x = Client::connect(&app);
    let mut y = Client::connect(&app);

    x.send(&app, r#"{"type":"join","roomId":"r1","username":"x"}"#).unwrap();
    let got = x.recv_all();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0]["type"], "JOINED");
    assert_eq!(got[0]["clients"].as_array().unwrap().len(), 1);

    y.send(&app, r#"{"type":"join","roomId":"r1","username":"y"}"#).unwrap();
    for c in [&mut x, &mut y] {
        let got = c.recv_all();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0]["username"], "y");
        assert_eq!(got[0]["clients"].as_array().unwrap().len(), 2);
    }

    x.send(&app, r#"{"type":"code-change","roomId":"r1","code":"print(1)"}"#).unwrap();
    let echoed = x.recv_all();
    let relayed = y.recv_all();
    assert_eq!(relayed[0]["type"], "CODE_CHANGE");
    assert_eq!(relayed[0]["code"], "print(1)");
    // sender receives its own echo
    assert_eq!(echoed[0]["code"], "print(1)");
}

#[test]
fn sync_code_reaches_only_target() {
    let app = app();
    let mut x = Client::connect(&app);
    let mut y = Client::connect(&app);
    let mut z = Client::connect(&app);
    x.send(&app, r#"{"type":"join","roomId":"r1"}"#).unwrap();
    y.send(&app, r#"{"type":"join","roomId":"r1"}"#).unwrap();
    z.send(&app, r#"{"type":"join","roomId":"r1"}"#).unwrap();
    for c in [&mut x, &mut y, &mut z] {
        c.recv_all();
    }

    let target = z.session_id();
    let frame = format!(r#"{{"type":"sync-code","socketId":"{target}","roomId":"r1","code":"state"}}"#);
    x.send(&app, &frame).unwrap();

    assert!(x.recv_all().is_empty());
    assert!(y.recv_all().is_empty());
    let got = z.recv_all();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0]["type"], "CODE_CHANGE");
    assert_eq!(got[0]["code"], "state");
}

#[test]
fn leave_notifies_room_then_unsubscribes() {
    let app = app();
    let mut x = Client::connect(&app);
    let mut y = Client::connect(&app);
    x.send(&app, r#"{"type":"join","roomId":"r1","username":"x"}"#).unwrap();
    y.send(&app, r#"{"type":"join","roomId":"r1","username":"y"}"#).unwrap();
    x.recv_all();
    y.recv_all();

    let sid = x.session_id();
    let frame = format!(r#"{{"type":"leave","socketId":"{sid}","roomId":"r1"}}"#);
    x.send(&app, &frame).unwrap();

    let seen_by_y = y.recv_all();
    assert_eq!(seen_by_y[0]["type"], "DISCONNECTED");
    assert_eq!(seen_by_y[0]["socketId"], sid.as_str());
    assert_eq!(seen_by_y[0]["username"], "x");
    assert_eq!(x.recv_all()[0]["type"], "DISCONNECTED");
    assert_eq!(x.ctx.phase(), &Phase::Left);

    // x no longer hears the room
    y.send(&app, r#"{"type":"code-change","roomId":"r1","code":"a"}"#).unwrap();
    assert!(x.recv_all().is_empty());

    // closing after leave does not broadcast again
    y.recv_all();
    x.close(&app);
    assert!(y.recv_all().is_empty());
}

#[test]
fn socket_close_disconnects_and_cleans_room() {
    let app = app();
    let mut x = Client::connect(&app);
    let mut y = Client::connect(&app);
    x.send(&app, r#"{"type":"join","roomId":"r1","username":"x"}"#).unwrap();
    y.send(&app, r#"{"type":"join","roomId":"r1","username":"y"}"#).unwrap();
    y.recv_all();

    x.close(&app);
    let got = y.recv_all();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0]["type"], "DISCONNECTED");
    assert_eq!(got[0]["username"], "x");

    y.close(&app);
    assert_eq!(app.relay_state().stats().rooms, 0);
    assert_eq!(app.relay_state().stats().sessions, 0);
    assert_eq!(app.hub().connection_count(), 0);
}

#[test]
fn phase_violations_are_rejected() {
    let app = app();
    let mut x = Client::connect(&app);

    assert_eq!(
        x.send(&app, r#"{"type":"code-change","roomId":"r1","code":"a"}"#),
        Err("INVALID_STATE".to_string())
    );

    x.send(&app, r#"{"type":"join","roomId":"r1"}"#).unwrap();
    assert_eq!(
        x.send(&app, r#"{"type":"join","roomId":"r2"}"#),
        Err("INVALID_STATE".to_string())
    );
    assert_eq!(
        x.send(&app, r#"{"type":"leave","socketId":"someone-else","roomId":"r1"}"#),
        Err("INVALID_STATE".to_string())
    );
    assert_eq!(app.relay_state().stats().sessions, 1);
}

#[test]
fn unjoined_close_is_silent() {
    let app = app();
    let x = Client::connect(&app);
    let mut y = Client::connect(&app);
    y.send(&app, r#"{"type":"join","roomId":"r1"}"#).unwrap();
    y.recv_all();

    x.close(&app);
    assert!(y.recv_all().is_empty());
    assert_eq!(app.relay_state().stats().sessions, 1);
}

#[test]
fn frames_for_other_rooms_are_rejected() {
    let app = app();
    let mut x = Client::connect(&app);
    let mut y = Client::connect(&app);
    let mut z = Client::connect(&app);
    x.send(&app, r#"{"type":"join","roomId":"r1"}"#).unwrap();
    y.send(&app, r#"{"type":"join","roomId":"r1"}"#).unwrap();
    z.send(&app, r#"{"type":"join","roomId":"r2"}"#).unwrap();
    for c in [&mut x, &mut y, &mut z] {
        c.recv_all();
    }

    assert_eq!(
        x.send(&app, r#"{"type":"code-change","roomId":"r2","code":"intrude"}"#),
        Err("INVALID_STATE".to_string())
    );

    // target lives in r2, whichever roomId the frame claims
    let outsider = z.session_id();
    for room in ["r1", "r2"] {
        let frame = format!(
            r#"{{"type":"sync-code","socketId":"{outsider}","roomId":"{room}","code":"intrude"}}"#
        );
        assert_eq!(x.send(&app, &frame), Err("INVALID_STATE".to_string()));
    }

    let sid = x.session_id();
    let frame = format!(r#"{{"type":"leave","socketId":"{sid}","roomId":"r2"}}"#);
    assert_eq!(x.send(&app, &frame), Err("INVALID_STATE".to_string()));

    assert!(z.recv_all().is_empty());
    assert!(y.recv_all().is_empty());
    assert!(matches!(x.ctx.phase(), Phase::Joined { .. }));

    // same-room traffic still flows
    let peer = y.session_id();
    let frame = format!(r#"{{"type":"sync-code","socketId":"{peer}","roomId":"r1","code":"ok"}}"#);
    x.send(&app, &frame).unwrap();
    assert_eq!(y.recv_all()[0]["code"], "ok");
}
