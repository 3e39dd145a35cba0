//! Pull-based audio stream for one synthesis call.

use bytes::Bytes;
use futures::Stream;
use tracing::{debug, error, info};

use super::connection::ConnectionManager;
use super::frames::{FrameParser, ParseEvent};
use crate::core::tts::base::{AudioChunk, TTSError, TTSResult};

/// Ordered audio chunks of one turn.
///
/// The socket is only read when the consumer asks for the next chunk, so a
/// message's state transition and chunk emission always finish before the
/// next message is read. The stream is single-pass: once it returns `None`
/// it stays exhausted.
///
/// Dropping the stream before completion closes the connection in the
/// background. Call [`AudioStream::cancel`] to close it immediately.
///
/// # Example
///
/// ```rust,no_run
/// use readaloud::core::tts::edge::{EdgeTTS, OutputFormat};
///
/// # async fn run() -> readaloud::core::tts::TTSResult<()> {
/// let tts = EdgeTTS::new("en-US-AriaNeural", OutputFormat::default(), None)?;
/// let mut stream = tts.synthesize("Hello", None).await?;
/// while let Some(chunk) = stream.next_chunk().await {
///     let chunk = chunk?;
///     println!("{} bytes", chunk.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AudioStream {
    connection: ConnectionManager,
    parser: FrameParser,
    request_id: String,
    finished: bool,
}

impl AudioStream {
    pub(crate) fn new(connection: ConnectionManager, request_id: String) -> Self {
        Self {
            connection,
            parser: FrameParser::new(),
            request_id,
            finished: false,
        }
    }

    /// The `X-RequestId` sent with this call.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Messages skipped by the parser so far.
    pub fn ignored_frames(&self) -> u64 {
        self.parser.ignored_frames()
    }

    /// Pulls the next audio chunk.
    ///
    /// Returns `None` when the turn ended or the server closed the
    /// connection. A transport failure is returned once as
    /// [`TTSError::Stream`]; the connection is closed before it is returned.
    pub async fn next_chunk(&mut self) -> Option<TTSResult<AudioChunk>> {
        if self.finished {
            return None;
        }

        loop {
            let message = match self.connection.recv().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    error!(request_id = %self.request_id, "Transport error: {}", e);
                    self.parser.fail();
                    self.finish().await;
                    let err = match e {
                        TTSError::Stream(_) => e,
                        other => TTSError::Stream(other.to_string()),
                    };
                    return Some(Err(err));
                }
                None => {
                    self.parser.finish();
                    self.finish().await;
                    return None;
                }
            };

            match self.parser.feed(message) {
                ParseEvent::Audio(chunk) => return Some(Ok(chunk)),
                ParseEvent::Completed => {
                    self.finish().await;
                    return None;
                }
                ParseEvent::Started | ParseEvent::Ignored => continue,
            }
        }
    }

    /// Stops the stream and closes the connection. Safe to call at any time,
    /// including after completion.
    pub async fn cancel(&mut self) {
        if self.finished {
            return;
        }
        info!(
            request_id = %self.request_id,
            chunks = self.parser.audio_chunks(),
            "Synthesis cancelled"
        );
        self.finish().await;
    }

    /// Drains the stream into a single buffer.
    pub async fn collect_audio(mut self) -> TTSResult<Bytes> {
        let mut audio = Vec::new();
        while let Some(chunk) = self.next_chunk().await {
            audio.extend_from_slice(&chunk?);
        }
        Ok(Bytes::from(audio))
    }

    /// Adapts the stream to [`futures::Stream`], e.g. for an HTTP body.
    pub fn into_stream(self) -> impl Stream<Item = TTSResult<AudioChunk>> + Send + 'static {
        futures::stream::unfold(self, |mut stream| async move {
            stream.next_chunk().await.map(|item| (item, stream))
        })
    }

    async fn finish(&mut self) {
        self.finished = true;
        self.connection.close().await;
        debug!(
            request_id = %self.request_id,
            chunks = self.parser.audio_chunks(),
            ignored = self.parser.ignored_frames(),
            "Audio stream finished"
        );
    }
}

impl Drop for AudioStream {
    fn drop(&mut self) {
        let Some(mut transport) = self.connection.take_transport() else {
            return;
        };
        debug!(request_id = %self.request_id, "Audio stream dropped before completion");
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _ = transport.close().await;
            });
        }
    }
}
