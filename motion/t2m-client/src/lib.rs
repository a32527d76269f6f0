//! Client for the Text2Motion generation API
//!
//! Sends an extracted [`t2m_rig::Skeleton`] together with a text prompt and
//! returns the generated animation payload as JSON text, ready for
//! [`t2m_rig::AnimationPayload::from_json`].

pub mod client;
pub mod duration;
pub mod error;
pub mod model;

pub use client::{
    API_KEY_HEADER, ClientConfig, DEFAULT_HOST, DEFAULT_TIMEOUT_SECS, GenerationService,
    Text2MotionClient,
};
pub use duration::{MAX_DURATION_SECONDS, RequestDuration, snap_frames};
pub use error::{ClientError, ErrorKind, Result};
pub use model::{DEFAULT_PROMPT, GenerateRequest, GenerateResponse, ModelVersion};
