//! Scripted transport used by the unit tests of this module tree.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use super::connection::{Connector, SpeechTransport};
use super::request::RequestIdSource;
use crate::core::tts::base::{TTSError, TTSResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Sent(String),
    Received(usize),
    Closed,
}

/// Shared record of everything a scripted transport did.
#[derive(Debug, Clone, Default)]
pub struct TransportLog(Arc<Mutex<Vec<TransportEvent>>>);

impl TransportLog {
    fn push(&self, event: TransportEvent) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<TransportEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                TransportEvent::Sent(frame) => Some(frame),
                _ => None,
            })
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == TransportEvent::Closed)
            .count()
    }
}

/// Replays a fixed list of inbound messages. `Err` entries simulate a
/// transport failure at that point; running off the end simulates a remote
/// close.
pub struct ScriptedTransport {
    script: VecDeque<TTSResult<Bytes>>,
    read: usize,
    fail_sends: bool,
    log: TransportLog,
}

impl ScriptedTransport {
    pub fn new(script: Vec<TTSResult<Bytes>>) -> Self {
        Self {
            script: script.into(),
            read: 0,
            fail_sends: false,
            log: TransportLog::default(),
        }
    }

    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn log(&self) -> TransportLog {
        self.log.clone()
    }
}

#[async_trait]
impl SpeechTransport for ScriptedTransport {
    async fn send_text(&mut self, frame: String) -> TTSResult<()> {
        if self.fail_sends {
            return Err(TTSError::Stream("broken pipe".into()));
        }
        self.log.push(TransportEvent::Sent(frame));
        Ok(())
    }

    async fn next_message(&mut self) -> Option<TTSResult<Bytes>> {
        let next = self.script.pop_front()?;
        self.log.push(TransportEvent::Received(self.read));
        self.read += 1;
        Some(next)
    }

    async fn close(&mut self) -> TTSResult<()> {
        self.log.push(TransportEvent::Closed);
        Ok(())
    }
}

/// Hands out one pre-built transport, or refuses to connect.
pub struct ScriptedConnector {
    transport: Mutex<Option<ScriptedTransport>>,
    refusal: Option<String>,
    urls: Mutex<Vec<String>>,
}

impl ScriptedConnector {
    pub fn new(transport: ScriptedTransport) -> Self {
        Self {
            transport: Mutex::new(Some(transport)),
            refusal: None,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn refusing(reason: &str) -> Self {
        Self {
            transport: Mutex::new(None),
            refusal: Some(reason.to_string()),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(&self, url: &str) -> TTSResult<Box<dyn SpeechTransport>> {
        self.urls.lock().unwrap().push(url.to_string());
        if let Some(reason) = &self.refusal {
            return Err(TTSError::Connection(reason.clone()));
        }
        let transport = self
            .transport
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| TTSError::Connection("script exhausted".into()))?;
        Ok(Box::new(transport))
    }
}

/// Request ids `req-0`, `req-1`, ...
#[derive(Debug, Default)]
pub struct SequentialIds(std::sync::atomic::AtomicUsize);

impl RequestIdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        format!("req-{n}")
    }
}

pub fn text_frame(path: &str) -> Bytes {
    Bytes::from(format!(
        "X-RequestId:req-0\r\nContent-Type:application/json; charset=utf-8\r\nPath:{path}\r\n\r\n{{}}"
    ))
}

pub fn audio_frame(payload: &[u8]) -> Bytes {
    let mut buf = b"X-RequestId:req-0\r\nContent-Type:audio/mpeg\r\nPath:audio\r\n".to_vec();
    buf.extend_from_slice(payload);
    Bytes::from(buf)
}
