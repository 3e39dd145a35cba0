//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `speak` - Streaming text-to-speech endpoint
//! - `voices` - Voice catalog endpoint

pub mod api;
pub mod speak;
pub mod voices;
