mod common;

use bytes::Bytes;
use futures::StreamExt;
use tokio_tungstenite::tungstenite::protocol::Message;

use common::{CLOSE_MARKER, audio_message, full_turn, spawn_edge_server, text_message};
use readaloud::core::tts::edge::{
    EdgeEndpoints, EdgeTTS, MetadataOptions, OutputFormat, ProsodyOptions,
};
use readaloud::core::tts::TTSError;

fn session(url: &str, format: OutputFormat) -> EdgeTTS {
    common::init_crypto();
    EdgeTTS::new("en-US-ChristopherNeural", format, None)
        .unwrap()
        .with_endpoints(EdgeEndpoints {
            synthesis_url: url.to_string(),
            voices_url: "http://127.0.0.1:1/voices".to_string(),
        })
}

#[tokio::test]
async fn test_synthesis_over_websocket() {
    let (url, received) = spawn_edge_server(full_turn(&[b"A", b"B", b"C"])).await;
    let tts = session(&url, OutputFormat::Webm24Khz16BitMonoOpus);

    let mut stream = tts
        .synthesize("Hello, world", Some(ProsodyOptions::new().with_rate("-10%")))
        .await
        .expect("Should connect");

    let request_id = stream.request_id().to_string();
    assert_eq!(request_id.len(), 32);

    let mut chunks = Vec::new();
    while let Some(chunk) = stream.next_chunk().await {
        chunks.push(chunk.expect("Should stream audio"));
    }
    assert_eq!(chunks, vec![Bytes::from("A"), Bytes::from("B"), Bytes::from("C")]);

    let frames = received.await.unwrap();
    assert_eq!(frames.len(), 3);

    let config = &frames[0];
    assert!(config.starts_with("Content-Type:application/json; charset=utf-8\r\nPath:speech.config\r\n\r\n"));
    assert!(config.contains("\"outputFormat\":\"webm-24khz-16bit-mono-opus\""));
    assert!(config.contains("\"wordBoundaryEnabled\":\"false\""));

    let ssml = &frames[1];
    assert!(ssml.starts_with(&format!(
        "X-RequestId:{request_id}\r\nContent-Type:application/ssml+xml\r\nPath:ssml\r\n\r\n"
    )));
    assert!(ssml.contains(r#"xml:lang="en-US""#));
    assert!(ssml.contains(r#"<voice name="en-US-ChristopherNeural">"#));
    assert!(ssml.contains(r#"<prosody pitch="+0%" rate="-10%" volume="medium">Hello, world</prosody>"#));

    assert_eq!(frames[2], CLOSE_MARKER);
}

#[tokio::test]
async fn test_each_call_uses_new_connection_and_request_id() {
    let (first_url, first) = spawn_edge_server(full_turn(&[b"1"])).await;
    let (second_url, second) = spawn_edge_server(full_turn(&[b"2"])).await;

    let a = session(&first_url, OutputFormat::default())
        .synthesize("one", None)
        .await
        .unwrap();
    let b = session(&second_url, OutputFormat::default())
        .synthesize("two", None)
        .await
        .unwrap();
    assert_ne!(a.request_id(), b.request_id());

    assert_eq!(a.collect_audio().await.unwrap(), Bytes::from("1"));
    assert_eq!(b.collect_audio().await.unwrap(), Bytes::from("2"));

    assert!(first.await.unwrap()[1].contains(">one</prosody>"));
    assert!(second.await.unwrap()[1].contains(">two</prosody>"));
}

#[tokio::test]
async fn test_cancel_closes_connection() {
    let (url, received) = spawn_edge_server(full_turn(&[b"A", b"B", b"C"])).await;
    let tts = session(&url, OutputFormat::default());

    let mut stream = tts.synthesize("Stop early", None).await.unwrap();
    assert_eq!(stream.next_chunk().await.unwrap().unwrap(), Bytes::from("A"));

    stream.cancel().await;
    assert!(stream.is_finished());
    assert!(stream.next_chunk().await.is_none());

    let frames = received.await.unwrap();
    assert_eq!(frames.last().map(String::as_str), Some(CLOSE_MARKER));
}

#[tokio::test]
async fn test_metadata_frames_are_skipped() {
    let script = vec![
        text_message("turn.start", "{}"),
        text_message("response", "{\"context\":{\"serviceTag\":\"x\"}}"),
        audio_message(b"first"),
        text_message("audio.metadata", "{\"Metadata\":[]}"),
        audio_message(b"second"),
        text_message("turn.end", "{}"),
    ];
    let (url, _received) = spawn_edge_server(script).await;
    common::init_crypto();

    let metadata = MetadataOptions {
        word_boundary_enabled: true,
        ..Default::default()
    };
    let tts = EdgeTTS::new("en-US-AriaNeural", OutputFormat::default(), Some(metadata))
        .unwrap()
        .with_endpoints(EdgeEndpoints {
            synthesis_url: url,
            voices_url: "http://127.0.0.1:1/voices".to_string(),
        });

    let chunks: Vec<_> = tts
        .synthesize("Hi", None)
        .await
        .unwrap()
        .into_stream()
        .map(|chunk| chunk.unwrap())
        .collect()
        .await;

    assert_eq!(chunks, vec![Bytes::from("first"), Bytes::from("second")]);
}

#[tokio::test]
async fn test_server_close_before_turn_end_completes_stream() {
    let script = vec![
        text_message("turn.start", "{}"),
        audio_message(b"partial"),
        Message::Close(None),
    ];
    let (url, _received) = spawn_edge_server(script).await;

    let audio = session(&url, OutputFormat::default())
        .synthesize("Cut off", None)
        .await
        .unwrap()
        .collect_audio()
        .await
        .unwrap();

    assert_eq!(audio, Bytes::from("partial"));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = session(&format!("ws://127.0.0.1:{port}/edge/v1"), OutputFormat::default())
        .synthesize("Anyone there?", None)
        .await
        .unwrap_err();

    assert!(matches!(err, TTSError::Connection(_)));
}
