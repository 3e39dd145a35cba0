//! Local stand-ins for the read-aloud service used by the integration tests.

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::{accept_async, tungstenite::protocol::Message};

pub const CLOSE_MARKER: &str = "<close>";

/// Makes sure a rustls crypto provider is installed before any client is built.
pub fn init_crypto() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

pub fn text_message(path: &str, body: &str) -> Message {
    Message::Text(
        format!(
            "X-RequestId:fake\r\nContent-Type:application/json; charset=utf-8\r\nPath:{path}\r\n\r\n{body}"
        )
        .into(),
    )
}

/// Binary audio frame laid out like the real service: a big-endian header
/// length, the header lines ending in `Path:audio\r\n`, then the payload.
pub fn audio_message(payload: &[u8]) -> Message {
    let header = b"X-RequestId:fake\r\nContent-Type:audio/mpeg\r\nX-StreamId:1\r\nPath:audio\r\n";
    let mut buf = (header.len() as u16).to_be_bytes().to_vec();
    buf.extend_from_slice(header);
    buf.extend_from_slice(payload);
    Message::Binary(buf.into())
}

pub fn full_turn(payloads: &[&[u8]]) -> Vec<Message> {
    let mut script = vec![text_message("turn.start", "{\"context\":{}}")];
    for payload in payloads {
        script.push(audio_message(payload));
    }
    script.push(text_message("turn.end", "{}"));
    script
}

/// Accepts one WebSocket connection, waits for the config and SSML frames,
/// replays `script`, then records everything else the client sends until it
/// closes.
///
/// Returns the endpoint URL and a receiver for the client's text frames, with
/// [`CLOSE_MARKER`] appended when a close frame arrived.
pub async fn spawn_edge_server(script: Vec<Message>) -> (String, oneshot::Receiver<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = accept_async(stream).await.unwrap();
        let (mut write, mut read) = ws.split();
        let mut received = Vec::new();

        while received.len() < 2 {
            match read.next().await {
                Some(Ok(Message::Text(text))) => received.push(text.to_string()),
                Some(Ok(_)) => continue,
                _ => break,
            }
        }

        for message in script {
            if write.send(message).await.is_err() {
                break;
            }
        }

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => received.push(text.to_string()),
                Ok(Message::Close(_)) => {
                    received.push(CLOSE_MARKER.to_string());
                    break;
                }
                Ok(_) => continue,
                Err(_) => break,
            }
        }

        let _ = tx.send(received);
    });

    (format!("ws://127.0.0.1:{}/edge/v1", addr.port()), rx)
}
