//! End-to-end coverage of the realtime dispatcher against an in-process
//! WebSocket server: single-connection invariant, classification
//! completeness, idempotent disconnect, and stale-handle rejection.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::routing::any;
use tokio::sync::broadcast;

use jaseats_client::error::RealtimeError;
use jaseats_client::realtime::{
    Channel, ConnectionState, InboundEvent, RealtimeDispatcher, RealtimeNotification,
};

/// What the mock server does with each accepted connection.
#[derive(Clone)]
enum Mode {
    /// Read until the client closes.
    Silent,
    /// Send the scripted frames, then read until the client closes.
    Script(Arc<Vec<String>>),
    /// Echo every text frame back.
    Echo,
    /// Send a numbered chat frame on every tick.
    Stream(Duration),
}

#[derive(Clone)]
struct WsState {
    live: Arc<AtomicUsize>,
    mode: Mode,
}

async fn spawn_ws_server(mode: Mode) -> (SocketAddr, Arc<AtomicUsize>) {
    let live = Arc::new(AtomicUsize::new(0));
    let state = WsState {
        live: Arc::clone(&live),
        mode,
    };
    let router = axum::Router::new()
        .route("/ws", any(ws_route))
        .with_state(state);

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("listener must bind");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener must expose an address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    (addr, live)
}

async fn ws_route(ws: WebSocketUpgrade, State(state): State<WsState>) -> axum::response::Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: WsState) {
    state.live.fetch_add(1, Ordering::SeqCst);

    match state.mode {
        Mode::Silent => {
            read_until_close(&mut socket).await;
        }
        Mode::Script(frames) => {
            for frame in frames.iter() {
                if socket.send(WsMessage::text(frame.clone())).await.is_err() {
                    break;
                }
            }
            read_until_close(&mut socket).await;
        }
        Mode::Echo => {
            while let Some(Ok(msg)) = socket.recv().await {
                match msg {
                    WsMessage::Text(text) => {
                        if socket.send(WsMessage::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    WsMessage::Close(_) => break,
                    _ => {}
                }
            }
        }
        Mode::Stream(interval) => {
            let mut n = 0_i64;
            loop {
                tokio::select! {
                    msg = socket.recv() => {
                        match msg {
                            Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => break,
                            _ => {}
                        }
                    }
                    () = tokio::time::sleep(interval) => {
                        let frame = format!(r#"{{"type":"chat","n":{n}}}"#);
                        n += 1;
                        if socket.send(WsMessage::text(frame)).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }

    state.live.fetch_sub(1, Ordering::SeqCst);
}

async fn read_until_close(socket: &mut WebSocket) {
    while let Some(Ok(msg)) = socket.recv().await {
        if matches!(msg, WsMessage::Close(_)) {
            break;
        }
    }
}

async fn drain_events(rx: &mut broadcast::Receiver<InboundEvent>) -> Vec<InboundEvent> {
    let mut out = Vec::new();
    while let Ok(Ok(event)) = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await {
        out.push(event);
    }
    out
}

async fn drain_lifecycle(
    rx: &mut broadcast::Receiver<RealtimeNotification>,
) -> Vec<RealtimeNotification> {
    let mut out = Vec::new();
    while let Ok(Ok(notification)) =
        tokio::time::timeout(Duration::from_millis(300), rx.recv()).await
    {
        out.push(notification);
    }
    out
}

#[tokio::test]
async fn connect_twice_leaves_exactly_one_live_connection() {
    let (addr, live) = spawn_ws_server(Mode::Silent).await;
    let url = format!("ws://{addr}/ws");
    let dispatcher = RealtimeDispatcher::new(64);

    let Ok(()) = dispatcher.connect(&url).await else {
        panic!("first connect must succeed");
    };
    let Ok(()) = dispatcher.connect(&url).await else {
        panic!("second connect must succeed");
    };

    // Give the server time to observe the first connection closing.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(live.load(Ordering::SeqCst), 1);
    assert!(dispatcher.is_connected().await);

    assert!(dispatcher.disconnect().await);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn classification_delivers_each_tag_to_exactly_its_channel() {
    let frames: Vec<String> = [
        r#"{"type":"auth","ok":true}"#,
        r#"{"type":"authResponse","ok":true}"#,
        r#"{"type":"orderUpdate","orderId":"O1"}"#,
        r#"{"type":"orderStatusChange","orderId":"O1"}"#,
        r#"{"type":"chat","content":"hi"}"#,
        r#"{"type":"privateChat","content":"hi"}"#,
        r#"{"type":"groupChat","content":"hi"}"#,
        r#"{"msgType":"systemMessage","content":"maintenance tonight"}"#,
        r#"{"type":"merchantUpdate","merchantId":7}"#,
        r#"{"type":"menuUpdate","merchantId":7}"#,
        r#"{"type":"recommend","recipeId":"R1"}"#,
        r#"{"type":"notification","body":"order ready"}"#,
        r#"{"type":"systemNotification","body":"new version"}"#,
        r#"{"type":"weatherAlert","body":"rain"}"#,
        r#"{oops, not json"#,
    ]
    .into_iter()
    .map(str::to_string)
    .collect();

    let (addr, _live) = spawn_ws_server(Mode::Script(Arc::new(frames))).await;
    let dispatcher = RealtimeDispatcher::new(64);

    let mut receivers: Vec<_> = Channel::ALL
        .into_iter()
        .map(|channel| (channel, dispatcher.subscribe(channel)))
        .collect();
    let mut lifecycle = dispatcher.subscribe_lifecycle();

    let Ok(()) = dispatcher
        .connect(&format!("ws://{addr}/ws"))
        .await
    else {
        panic!("connect must succeed");
    };

    let expected = [
        (Channel::Auth, 2),
        (Channel::Order, 2),
        (Channel::Chat, 4),
        (Channel::Merchant, 2),
        (Channel::Recommendation, 1),
        (Channel::Notification, 2),
        (Channel::Message, 1),
    ];
    for (channel, rx) in &mut receivers {
        let events = drain_events(rx).await;
        let Some((_, count)) = expected.iter().find(|(c, _)| c == channel) else {
            panic!("unexpected channel");
        };
        assert_eq!(
            events.len(),
            *count,
            "channel {} must receive exactly its own tags",
            channel.as_str()
        );
        for event in events {
            assert_eq!(event.channel, *channel);
        }
    }

    let notifications = drain_lifecycle(&mut lifecycle).await;
    assert!(matches!(
        notifications.first(),
        Some(RealtimeNotification::Opened)
    ));
    let parse_failures: Vec<_> = notifications
        .iter()
        .filter(|n| matches!(n, RealtimeNotification::ParseFailure { .. }))
        .collect();
    assert_eq!(parse_failures.len(), 1, "exactly one parse failure");
    let Some(RealtimeNotification::ParseFailure { raw, error }) = parse_failures.first() else {
        panic!("parse failure expected");
    };
    assert_eq!(raw, r#"{oops, not json"#);
    assert!(!error.is_empty());
}

#[tokio::test]
async fn disconnect_is_idempotent() {
    let (addr, _live) = spawn_ws_server(Mode::Silent).await;
    let dispatcher = RealtimeDispatcher::new(64);

    // Nothing to close yet: trivial success.
    assert!(!dispatcher.disconnect().await);

    let Ok(()) = dispatcher.connect(&format!("ws://{addr}/ws")).await else {
        panic!("connect must succeed");
    };
    assert!(dispatcher.disconnect().await);
    assert!(!dispatcher.disconnect().await);
    assert_eq!(dispatcher.state().await, ConnectionState::Disconnected);
}

#[tokio::test]
async fn send_round_trips_through_the_echo_server() {
    let (addr, _live) = spawn_ws_server(Mode::Echo).await;
    let dispatcher = RealtimeDispatcher::new(64);
    let mut chat = dispatcher.subscribe(Channel::Chat);

    let Ok(()) = dispatcher.connect(&format!("ws://{addr}/ws")).await else {
        panic!("connect must succeed");
    };

    let Ok(()) = dispatcher
        .send(&serde_json::json!({"type": "chat", "content": "ping"}))
        .await
    else {
        panic!("send must succeed while open");
    };

    let Ok(Ok(event)) = tokio::time::timeout(Duration::from_secs(2), chat.recv()).await else {
        panic!("echoed frame must arrive on the chat channel");
    };
    assert_eq!(
        event.payload.get("content").and_then(serde_json::Value::as_str),
        Some("ping")
    );

    dispatcher.disconnect().await;
    let result = dispatcher
        .send(&serde_json::json!({"type": "chat", "content": "late"}))
        .await;
    assert!(matches!(result, Err(RealtimeError::ConnectionAbsent)));
}

#[tokio::test]
async fn frames_arriving_after_disconnect_are_rejected() {
    let (addr, _live) = spawn_ws_server(Mode::Stream(Duration::from_millis(20))).await;
    let dispatcher = RealtimeDispatcher::new(256);
    let mut chat = dispatcher.subscribe(Channel::Chat);

    let Ok(()) = dispatcher.connect(&format!("ws://{addr}/ws")).await else {
        panic!("connect must succeed");
    };

    // The stream is alive: at least one frame must come through.
    let Ok(Ok(_)) = tokio::time::timeout(Duration::from_secs(2), chat.recv()).await else {
        panic!("streamed frame must arrive");
    };

    dispatcher.disconnect().await;
    // Let any frame already past the identity check land, then drop
    // everything published up to this point.
    tokio::time::sleep(Duration::from_millis(100)).await;
    while chat.try_recv().is_ok() {}

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(
        matches!(
            chat.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ),
        "no frame may be forwarded after disconnect"
    );
}

#[tokio::test]
async fn frames_are_delivered_in_receipt_order() {
    let frames: Vec<String> = (0..10)
        .map(|n| format!(r#"{{"type":"chat","n":{n}}}"#))
        .collect();
    let (addr, _live) = spawn_ws_server(Mode::Script(Arc::new(frames))).await;
    let dispatcher = RealtimeDispatcher::new(64);
    let mut chat = dispatcher.subscribe(Channel::Chat);

    let Ok(()) = dispatcher.connect(&format!("ws://{addr}/ws")).await else {
        panic!("connect must succeed");
    };

    for expected in 0..10 {
        let Ok(Ok(event)) = tokio::time::timeout(Duration::from_secs(2), chat.recv()).await else {
            panic!("frame {expected} must arrive");
        };
        assert_eq!(
            event.payload.get("n").and_then(serde_json::Value::as_i64),
            Some(expected)
        );
    }
}
