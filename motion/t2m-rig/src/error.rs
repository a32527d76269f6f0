use std::io;
use thiserror::Error;

use crate::object::ObjectKind;

/// Error types for skeleton extraction and animation import
#[derive(Error, Debug)]
pub enum RigError {
    /// I/O error while reading or writing rig, payload or save files
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The selected object is not an armature
    #[error("Object '{name}' is not an armature (found {kind})")]
    InvalidTarget { name: String, kind: ObjectKind },

    /// The armature has no bones to extract
    #[error("Armature '{0}' has no bones")]
    EmptyArmature(String),

    /// Two bones share the same name
    #[error("Duplicate bone name: {0}")]
    DuplicateBone(String),

    /// A bone references a parent that does not exist
    #[error("Bone '{bone}' references unknown parent '{parent}'")]
    UnknownParent { bone: String, parent: String },

    /// The parent chain of a bone loops back onto itself
    #[error("Bone hierarchy contains a cycle through '{0}'")]
    CyclicHierarchy(String),

    /// Forward and up axes cannot be the same axis
    #[error("Invalid axis arguments: forward {forward} and up {up} share an axis")]
    InvalidAxes { forward: String, up: String },

    /// Axis name could not be parsed
    #[error("Unknown axis '{0}', expected one of X, Y, Z, -X, -Y, -Z")]
    UnknownAxis(String),

    /// A track timestamp is not a finite, non-negative number of seconds
    #[error("Invalid timestamp '{timestamp}' in track for bone '{bone}'")]
    InvalidTimestamp { bone: String, timestamp: String },

    /// The payload duration is negative or not finite
    #[error("Invalid animation duration: {0}")]
    InvalidDuration(f64),

    /// The scene frame rate is zero, negative or not finite
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f32),

    /// Save file carries a version this build cannot read
    #[error("Unsupported save file version: {0}")]
    UnsupportedSaveVersion(String),

    /// The target object cannot hold animation data
    #[error("Object '{0}' cannot hold animation data")]
    NoAnimationData(String),
}

/// Result type using RigError
pub type Result<T> = std::result::Result<T, RigError>;
