//! Inbound frame classification.
//!
//! The service interleaves text frames (`turn.start`, `response`,
//! `audio.metadata`, `turn.end`) with binary audio frames on one socket.
//! [`FrameParser`] inspects each raw message, decodes only its header block,
//! and drives a small state machine:
//!
//! ```text
//! AwaitingTurnStart --turn.start--> StreamingAudio --turn.end--> TurnEnded
//!         |                               |
//!         +-----------transport error-----+----------------> Errored
//! ```
//!
//! Audio payloads are returned as zero-copy slices of the original buffer.

use bytes::Bytes;
use tracing::{debug, warn};

use super::config::{AUDIO_MARKER, HEADER_DELIMITER};

const PATH_TURN_START: &str = "turn.start";
const PATH_TURN_END: &str = "turn.end";
const PATH_AUDIO: &str = "audio";

/// Parser state for a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    AwaitingTurnStart,
    StreamingAudio,
    TurnEnded,
    Errored,
}

impl ParserState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ParserState::TurnEnded | ParserState::Errored)
    }
}

/// Result of feeding one message to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    /// `turn.start` received; audio may follow.
    Started,
    /// One audio chunk, exactly the bytes after the audio marker.
    Audio(Bytes),
    /// `turn.end` received; the stream is complete.
    Completed,
    /// Message produced no chunk and no state change.
    Ignored,
}

/// Header fields the parser cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameHeader {
    pub path: Option<String>,
    pub content_type: Option<String>,
}

impl FrameHeader {
    /// Parses `key:value` lines. Keys match case-insensitively; unknown keys
    /// and malformed lines are skipped.
    pub fn parse(header: &str) -> Self {
        let mut parsed = FrameHeader::default();
        for line in header.split("\r\n") {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().to_string();
            if key.eq_ignore_ascii_case("path") {
                parsed.path = Some(value);
            } else if key.eq_ignore_ascii_case("content-type") {
                parsed.content_type = Some(value);
            }
        }
        parsed
    }
}

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: FrameHeader,
    /// Offset of the first body byte within the original buffer.
    pub body_offset: usize,
}

impl Frame {
    /// Locates the header block of a raw message.
    ///
    /// Whichever of the audio marker and the blank-line delimiter occurs first
    /// decides the layout. Returns `None` when neither is present.
    pub fn classify(message: &[u8]) -> Option<Frame> {
        let marker = find(message, AUDIO_MARKER);
        let delimiter = find(message, HEADER_DELIMITER.as_bytes());

        match (marker, delimiter) {
            (Some(m), d) if d.is_none_or(|d| m < d) => {
                let header_end = m + AUDIO_MARKER.len();
                let mut header = FrameHeader::parse(&String::from_utf8_lossy(&message[..m]));
                header.path = Some(PATH_AUDIO.to_string());
                Some(Frame {
                    header,
                    body_offset: header_end,
                })
            }
            (_, Some(d)) => Some(Frame {
                header: FrameHeader::parse(&String::from_utf8_lossy(&message[..d])),
                body_offset: d + HEADER_DELIMITER.len(),
            }),
            _ => None,
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Turns raw socket messages into turn events and audio chunks.
#[derive(Debug)]
pub struct FrameParser {
    state: ParserState,
    ignored_frames: u64,
    audio_chunks: u64,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::AwaitingTurnStart,
            ignored_frames: 0,
            audio_chunks: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Number of messages that produced no event.
    #[inline]
    pub fn ignored_frames(&self) -> u64 {
        self.ignored_frames
    }

    /// Number of audio chunks emitted so far.
    #[inline]
    pub fn audio_chunks(&self) -> u64 {
        self.audio_chunks
    }

    /// Classifies one inbound message and advances the state machine.
    pub fn feed(&mut self, message: Bytes) -> ParseEvent {
        if self.state.is_terminal() {
            debug!(state = ?self.state, "Dropping message received after turn finished");
            return self.ignore(None);
        }

        let Some(frame) = Frame::classify(&message) else {
            warn!(len = message.len(), "Received message without a header block");
            return self.ignore(None);
        };

        let path = frame.header.path.as_deref().unwrap_or_default();

        if path.eq_ignore_ascii_case(PATH_TURN_START) {
            if self.state == ParserState::AwaitingTurnStart {
                debug!("Turn started");
                self.state = ParserState::StreamingAudio;
                return ParseEvent::Started;
            }
            return self.ignore(Some(path));
        }

        if path.eq_ignore_ascii_case(PATH_AUDIO) {
            if self.state != ParserState::StreamingAudio {
                warn!("Received audio before turn.start");
                return self.ignore(Some(path));
            }
            let payload = message.slice(frame.body_offset..);
            if payload.is_empty() {
                debug!("Skipping empty audio frame");
                return ParseEvent::Ignored;
            }
            self.audio_chunks += 1;
            debug!(
                chunk = self.audio_chunks,
                bytes = payload.len(),
                content_type = frame.header.content_type.as_deref().unwrap_or("unknown"),
                "Received audio chunk"
            );
            return ParseEvent::Audio(payload);
        }

        if path.eq_ignore_ascii_case(PATH_TURN_END) {
            debug!(chunks = self.audio_chunks, "Turn ended");
            self.state = ParserState::TurnEnded;
            return ParseEvent::Completed;
        }

        self.ignore(Some(path))
    }

    /// Marks the turn as failed. Subsequent messages are ignored.
    pub fn fail(&mut self) {
        self.state = ParserState::Errored;
    }

    /// Handles the transport closing on its own.
    ///
    /// Returns `true` if the turn was still open, in which case it is treated
    /// as complete.
    pub fn finish(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        warn!(
            state = ?self.state,
            chunks = self.audio_chunks,
            "Connection closed before turn.end"
        );
        self.state = ParserState::TurnEnded;
        true
    }

    fn ignore(&mut self, path: Option<&str>) -> ParseEvent {
        self.ignored_frames += 1;
        debug!(
            path = path.unwrap_or("<none>"),
            ignored = self.ignored_frames,
            "Ignoring frame"
        );
        ParseEvent::Ignored
    }
}
