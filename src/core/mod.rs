pub mod tts;

// Re-export commonly used types for convenience
pub use tts::{
    AudioChunk, AudioStream, EdgeEndpoints, EdgeTTS, MetadataOptions, OutputFormat,
    ProsodyOptions, TTSError, TTSResult, Voice,
};
