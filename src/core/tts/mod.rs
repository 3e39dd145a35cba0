mod base;
pub mod edge;

pub use base::{AudioChunk, TTSError, TTSResult};
pub use edge::{
    AudioStream, EdgeEndpoints, EdgeTTS, MetadataOptions, OutputFormat, ProsodyOptions, Voice,
};
